//! Remote command channel bridge.
//!
//! Sender devices issue LOAD and STOP commands; the host parses them off the
//! wire and hands the core the typed requests below. The core answers
//! through [`RemoteChannel`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::media::MediaDescriptor;

/// LOAD command from a sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRequest {
    pub descriptor: MediaDescriptor,
    pub sender_id: String,
    /// Request-level autoplay flag; overrides the descriptor's when present.
    #[serde(default)]
    pub autoplay: Option<bool>,
}

impl LoadRequest {
    pub fn new(descriptor: MediaDescriptor, sender_id: impl Into<String>) -> Self {
        Self {
            descriptor,
            sender_id: sender_id.into(),
            autoplay: None,
        }
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = Some(autoplay);
        self
    }

    /// Effective autoplay flag; unspecified means `true`.
    pub fn wants_autoplay(&self) -> bool {
        self.autoplay.or(self.descriptor.autoplay).unwrap_or(true)
    }
}

/// STOP command from a sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRequest {
    pub sender_id: String,
}

impl StopRequest {
    pub fn new(sender_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
        }
    }
}

/// Player state vocabulary of the outward status layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportedState {
    Idle,
    Playing,
    Paused,
    Buffering,
}

/// How much of the media status a broadcast should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusScope {
    Full,
    /// Player state only, media details left out.
    WithoutMedia,
}

/// Which failure path produced an error notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    Backend,
    Sink,
}

/// Error notification forwarded to senders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    /// Engine error code, for backend faults that carry one.
    pub code: Option<i32>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: Option<i32>) -> Self {
        self.code = code;
        self
    }
}

/// Outbound half of the sender protocol.
#[async_trait]
pub trait RemoteChannel: Send + Sync {
    /// Reject a LOAD whose media could not be accepted.
    async fn load_metadata_error(&self, request: &LoadRequest, error: &ErrorPayload)
        -> Result<()>;

    /// Report a fatal playback error to connected senders.
    async fn report_error(&self, error: &ErrorPayload) -> Result<()>;

    /// Confirm a STOP after the receiver has gone idle.
    async fn acknowledge_stop(&self, request: &StopRequest) -> Result<()>;

    /// Push the current media status to connected senders.
    async fn broadcast_status(&self, scope: StatusScope) -> Result<()>;

    /// Publish the discovery/display string for the running application.
    async fn set_application_state(&self, text: &str) -> Result<()>;

    /// Close the receiver application after prolonged inactivity.
    async fn stop_application(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autoplay_defaults_to_true() {
        let request = LoadRequest::new(MediaDescriptor::new("a.m3u8"), "sender-1");
        assert!(request.wants_autoplay());
    }

    #[test]
    fn request_autoplay_overrides_descriptor() {
        let descriptor = MediaDescriptor::new("a.m3u8").with_autoplay(true);
        let request = LoadRequest::new(descriptor, "sender-1").with_autoplay(false);
        assert!(!request.wants_autoplay());

        let descriptor = MediaDescriptor::new("a.m3u8").with_autoplay(false);
        let request = LoadRequest::new(descriptor, "sender-1");
        assert!(!request.wants_autoplay());
    }

    #[test]
    fn reported_state_wire_names() {
        let json = serde_json::to_string(&ReportedState::Buffering).unwrap();
        assert_eq!(json, "\"BUFFERING\"");
    }

    #[test]
    fn error_payload_builder() {
        let payload = ErrorPayload::new(ErrorCategory::Backend, "segment fetch failed")
            .with_code(Some(7));
        assert_eq!(payload.category, ErrorCategory::Backend);
        assert_eq!(payload.code, Some(7));
    }
}
