//! Idle timeout policy.
//!
//! Maps the current [`PlayerState`] to how long the receiver may sit in it
//! before the application is closed. `Buffering` and `Playing` are never
//! considered idle.

use std::time::Duration;

use crate::config::IdleTimeouts;
use crate::state::PlayerState;

/// Inactivity limit for `state`, or `None` when the state never times out.
pub fn timeout_for(state: PlayerState, timeouts: &IdleTimeouts) -> Option<Duration> {
    let timeout = match state {
        PlayerState::Launching => timeouts.launching,
        PlayerState::Loading => timeouts.loading,
        PlayerState::Paused => timeouts.paused,
        PlayerState::Stalled => timeouts.stalled,
        PlayerState::Done => timeouts.done,
        PlayerState::Idle => timeouts.idle,
        PlayerState::Buffering | PlayerState::Playing => return None,
    };

    (!timeout.is_zero()).then_some(timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let timeouts = IdleTimeouts::default();
        let five_minutes = Some(Duration::from_secs(300));

        assert_eq!(timeout_for(PlayerState::Launching, &timeouts), five_minutes);
        assert_eq!(timeout_for(PlayerState::Loading, &timeouts), five_minutes);
        assert_eq!(timeout_for(PlayerState::Done, &timeouts), five_minutes);
        assert_eq!(timeout_for(PlayerState::Idle, &timeouts), five_minutes);
        assert_eq!(
            timeout_for(PlayerState::Paused, &timeouts),
            Some(Duration::from_secs(1200))
        );
        assert_eq!(
            timeout_for(PlayerState::Stalled, &timeouts),
            Some(Duration::from_secs(30))
        );
        assert_eq!(timeout_for(PlayerState::Buffering, &timeouts), None);
        assert_eq!(timeout_for(PlayerState::Playing, &timeouts), None);
    }

    #[test]
    fn test_zero_disables() {
        let timeouts = IdleTimeouts {
            paused: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(timeout_for(PlayerState::Paused, &timeouts), None);
    }
}
