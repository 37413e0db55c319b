//! Streaming-protocol engine bridge.
//!
//! Adaptive streaming (HLS, DASH, Smooth Streaming) is delegated to an
//! external engine that feeds the shared [`MediaSink`]. The core only picks
//! the [`ProtocolKind`] and drives the engine's lifecycle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::error::Result;
use crate::media::MediaSink;

/// Playback backend chosen for a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolKind {
    Hls,
    Dash,
    SmoothStreaming,
    /// Direct media-sink playback, no engine involved.
    Native,
}

impl ProtocolKind {
    pub fn is_native(&self) -> bool {
        matches!(self, ProtocolKind::Native)
    }
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProtocolKind::Hls => "HLS",
            ProtocolKind::Dash => "DASH",
            ProtocolKind::SmoothStreaming => "SmoothStreaming",
            ProtocolKind::Native => "Native",
        };
        f.write_str(name)
    }
}

/// Snapshot of engine health.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineState {
    /// The engine ran out of data ahead of the play position.
    pub underflow: bool,
}

/// Fatal fault raised by an engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendFault {
    /// Engine-specific error code, when it has one.
    pub code: Option<i32>,
    pub message: String,
}

impl BackendFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }
}

/// Callback handed to an engine at creation time for reporting fatal faults.
///
/// Faults are queued back to the core; they are never handled on the
/// engine's own call stack.
#[derive(Clone)]
pub struct FaultReporter {
    report: Arc<dyn Fn(BackendFault) + Send + Sync>,
}

impl FaultReporter {
    pub fn new<F>(report: F) -> Self
    where
        F: Fn(BackendFault) + Send + Sync + 'static,
    {
        Self {
            report: Arc::new(report),
        }
    }

    pub fn report(&self, fault: BackendFault) {
        (self.report)(fault)
    }
}

impl fmt::Debug for FaultReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultReporter").finish_non_exhaustive()
    }
}

/// A live engine instance bound to one media URL.
#[async_trait]
pub trait ProtocolEngine: Send + Sync {
    /// Start fetching the manifest and feeding the sink.
    async fn load(&self) -> Result<()>;

    /// Stop feeding the sink and release engine resources.
    async fn unload(&self) -> Result<()>;

    fn state(&self) -> EngineState;
}

/// Creates engines for non-native protocols.
pub trait ProtocolEngineFactory: Send + Sync {
    /// Returns `Ok(None)` for [`ProtocolKind::Native`], which needs no engine.
    fn create(
        &self,
        kind: ProtocolKind,
        url: &str,
        sink: Arc<dyn MediaSink>,
        faults: FaultReporter,
    ) -> Result<Option<Box<dyn ProtocolEngine>>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn protocol_display() {
        assert_eq!(ProtocolKind::Hls.to_string(), "HLS");
        assert_eq!(ProtocolKind::SmoothStreaming.to_string(), "SmoothStreaming");
        assert!(ProtocolKind::Native.is_native());
        assert!(!ProtocolKind::Dash.is_native());
    }

    #[test]
    fn fault_reporter_forwards() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let reporter = FaultReporter::new(move |fault| sink.lock().unwrap().push(fault));

        reporter.report(BackendFault::new("manifest 404").with_code(3));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].code, Some(3));
        assert_eq!(seen[0].to_string(), "manifest 404");
    }
}
