//! Player state vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What is currently happening to the media. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    /// Provisional state between construction and the host's ready signal.
    Launching,
    Loading,
    Buffering,
    Playing,
    Paused,
    Stalled,
    Done,
    Idle,
}

impl PlayerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerState::Launching => "launching",
            PlayerState::Loading => "loading",
            PlayerState::Buffering => "buffering",
            PlayerState::Playing => "playing",
            PlayerState::Paused => "paused",
            PlayerState::Stalled => "stalled",
            PlayerState::Done => "done",
            PlayerState::Idle => "idle",
        }
    }

    /// States in which no media session can exist.
    pub fn is_sessionless(&self) -> bool {
        matches!(self, PlayerState::Launching | PlayerState::Idle)
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_serde_agree() {
        for state in [
            PlayerState::Launching,
            PlayerState::Loading,
            PlayerState::Buffering,
            PlayerState::Playing,
            PlayerState::Paused,
            PlayerState::Stalled,
            PlayerState::Done,
            PlayerState::Idle,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state));
        }
    }

    #[test]
    fn test_sessionless_states() {
        assert!(PlayerState::Idle.is_sessionless());
        assert!(PlayerState::Launching.is_sessionless());
        assert!(!PlayerState::Done.is_sessionless());
    }
}
