//! Error/recovery coordinator.
//!
//! Every session-ending failure is wrapped in a [`Failure`] and funnelled
//! through [`PlayerController::recover`](crate::controller::PlayerController),
//! which resets the player to `Idle` and then notifies senders exactly once
//! through [`notify`].

use bridge_traits::{LoadRequest, RemoteChannel};
use tracing::warn;

use crate::error::PlaybackError;

/// A failure that ends (or prevents) a playback session.
#[derive(Debug)]
pub struct Failure {
    error: PlaybackError,
    /// The LOAD being rejected, for failures raised while validating it.
    request: Option<LoadRequest>,
}

impl Failure {
    /// Failure of a LOAD before any session existed.
    pub fn rejected(request: LoadRequest, error: PlaybackError) -> Self {
        Self {
            error,
            request: Some(request),
        }
    }

    /// Runtime failure of a live session.
    pub fn fatal(error: PlaybackError) -> Self {
        Self {
            error,
            request: None,
        }
    }

    /// Wrap a LOAD-path error. Validation errors reject the request; anything
    /// else is treated as a runtime failure of the new session.
    pub fn from_load(request: LoadRequest, error: PlaybackError) -> Self {
        if error.is_validation() {
            Self::rejected(request, error)
        } else {
            Self::fatal(error)
        }
    }

    pub fn error(&self) -> &PlaybackError {
        &self.error
    }

    pub fn request(&self) -> Option<&LoadRequest> {
        self.request.as_ref()
    }
}

/// Forward `failure` to the sender side.
///
/// Rejected loads become a metadata-load error on the request; every other
/// failure is reported as a playback error.
pub async fn notify(remote: &dyn RemoteChannel, failure: &Failure) {
    let payload = failure.error.to_payload();

    let result = match &failure.request {
        Some(request) => remote.load_metadata_error(request, &payload).await,
        None => remote.report_error(&payload).await,
    };

    if let Err(err) = result {
        warn!(error = %err, "Failed to notify senders of playback failure");
    }
}
