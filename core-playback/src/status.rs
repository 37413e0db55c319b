//! Outward-facing status helpers.

use bridge_traits::{MediaDescriptor, ReportedState};

use crate::state::PlayerState;

pub const READY_TEXT: &str = "Ready To Cast";
pub const CASTING_TEXT: &str = "Now Casting";

/// Rewrite the status layer's `Paused` to `Buffering` while the core is
/// rebuffering. The status layer detects rebuffering late and reports it as a
/// pause in the meantime.
pub fn relabel(reported: ReportedState, internal: PlayerState) -> ReportedState {
    match (reported, internal) {
        (ReportedState::Paused, PlayerState::Buffering) => ReportedState::Buffering,
        (reported, _) => reported,
    }
}

/// Discovery/display string for the running application.
pub fn application_state_text(media: Option<&MediaDescriptor>) -> String {
    match media {
        Some(descriptor) => match descriptor.title() {
            Some(title) => format!("{}: {}", CASTING_TEXT, title),
            None => CASTING_TEXT.to_string(),
        },
        None => READY_TEXT.to_string(),
    }
}
