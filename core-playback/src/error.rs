//! # Playback Error Types
//!
//! Error taxonomy for the receiver's playback core. Every failure that ends a
//! session is one of [`PlaybackError::Validation`], [`PlaybackError::Backend`]
//! or [`PlaybackError::Sink`]; the remaining variants cover configuration and
//! collaborator plumbing.

use bridge_traits::error::BridgeError;
use bridge_traits::remote::{ErrorCategory, ErrorPayload};
use bridge_traits::BackendFault;
use thiserror::Error;

use crate::format::MediaKind;

/// Reasons a LOAD is rejected before any session is created.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Content id is empty")]
    EmptyContentId,

    #[error("Unrecognized media: {content_id}")]
    UnrecognizedMedia { content_id: String },

    #[error("Unsupported media kind {kind:?}: {content_id}")]
    UnsupportedKind { content_id: String, kind: MediaKind },
}

/// Errors that can occur in the playback core.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Session-ending failures
    // ========================================================================
    /// The load request was rejected up front.
    #[error("Invalid media: {0}")]
    Validation(#[from] ValidationError),

    /// The protocol engine reported a fatal fault.
    #[error("Playback backend failed: {0}")]
    Backend(BackendFault),

    /// The media sink failed at runtime.
    #[error("Media sink error: {0}")]
    Sink(String),

    // ========================================================================
    // Plumbing
    // ========================================================================
    /// A host bridge call failed.
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error (should not occur in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaybackError {
    pub fn is_validation(&self) -> bool {
        matches!(self, PlaybackError::Validation(_))
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, PlaybackError::Backend(_))
    }

    pub fn is_sink(&self) -> bool {
        matches!(self, PlaybackError::Sink(_))
    }

    /// Payload forwarded to senders when this error ends a session.
    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            PlaybackError::Validation(err) => {
                ErrorPayload::new(ErrorCategory::Validation, err.to_string())
            }
            PlaybackError::Backend(fault) => {
                ErrorPayload::new(ErrorCategory::Backend, fault.message.clone())
                    .with_code(fault.code)
            }
            other => ErrorPayload::new(ErrorCategory::Sink, other.to_string()),
        }
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
