//! Events published by the playback core on its [`EventBus`](core_runtime::EventBus).

use bridge_traits::ProtocolKind;
use serde::{Deserialize, Serialize};

use crate::format::format_duration;
use crate::state::PlayerState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum PlayerEvent {
    StateChanged {
        from: PlayerState,
        to: PlayerState,
    },
    /// The application-state string changed and was published.
    ApplicationStateChanged { text: String },
    SessionStarted {
        content_id: String,
        protocol: ProtocolKind,
    },
    SessionEnded { content_id: String },
    /// Play position update with preformatted clock labels.
    Progress {
        position_secs: f64,
        duration_secs: Option<f64>,
        elapsed: String,
        total: Option<String>,
    },
    SeekingChanged { seeking: bool },
    /// A session ended in error and the player went idle.
    Failed { message: String },
}

impl PlayerEvent {
    pub fn progress(position_secs: f64, duration_secs: Option<f64>) -> Self {
        PlayerEvent::Progress {
            position_secs,
            duration_secs,
            elapsed: format_duration(position_secs),
            total: duration_secs.map(format_duration),
        }
    }

    pub fn description(&self) -> String {
        match self {
            PlayerEvent::StateChanged { from, to } => format!("State changed: {} -> {}", from, to),
            PlayerEvent::ApplicationStateChanged { text } => format!("Application state: {}", text),
            PlayerEvent::SessionStarted { protocol, .. } => format!("Session started ({})", protocol),
            PlayerEvent::SessionEnded { .. } => "Session ended".to_string(),
            PlayerEvent::Progress { elapsed, total, .. } => match total {
                Some(total) => format!("Progress {} / {}", elapsed, total),
                None => format!("Progress {}", elapsed),
            },
            PlayerEvent::SeekingChanged { seeking } => format!("Seeking: {}", seeking),
            PlayerEvent::Failed { message } => format!("Playback failed: {}", message),
        }
    }
}
