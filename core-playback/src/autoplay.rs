//! Auto-play buffering controller.
//!
//! After a streaming engine has loaded, playback is held back until enough
//! contiguous media sits ahead of the play position. The probe itself is a
//! pure decision function; the controller owns the timer that paces it and
//! feeds it fresh readings from the media sink on every tick.

use bridge_traits::TimeRange;
use std::time::Duration;

use crate::config::AutoplayConfig;

/// Contiguous buffered media ahead of `position`.
///
/// Uses the range containing `position`; zero when no range does.
pub fn buffered_lead(position: Duration, ranges: &[TimeRange]) -> Duration {
    ranges
        .iter()
        .find(|range| range.contains(position))
        .map(|range| range.end.saturating_sub(position))
        .unwrap_or(Duration::ZERO)
}

/// What the controller should do after a probe tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStep {
    /// Start playback now; the probe is finished.
    Play,
    /// Check again after the given delay.
    Poll(Duration),
}

/// Polling state between engine load and first playback.
#[derive(Debug, Clone)]
pub struct BufferProbe {
    target: Duration,
    poll_interval: Duration,
    min_display: Duration,
    polls: u32,
}

impl BufferProbe {
    pub fn new(config: &AutoplayConfig) -> Self {
        Self {
            target: config.buffer_target,
            poll_interval: config.poll_interval,
            min_display: config.min_display,
            polls: 0,
        }
    }

    /// Delay before the first tick.
    pub fn initial_delay(&self) -> Duration {
        self.min_display
    }

    /// Number of buffered-lead checks made so far.
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Decide whether to start playback.
    ///
    /// Media that is short or has no known duration starts right away. Longer
    /// media starts once the buffered lead reaches the target.
    pub fn step(
        &mut self,
        position: Duration,
        duration: Option<Duration>,
        buffered: impl FnOnce() -> Vec<TimeRange>,
    ) -> ProbeStep {
        match duration {
            Some(total) if total > self.target => {}
            _ => return ProbeStep::Play,
        }

        self.polls += 1;
        let lead = buffered_lead(position, &buffered());
        if lead >= self.target {
            ProbeStep::Play
        } else {
            ProbeStep::Poll(self.poll_interval)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(value: u64) -> Duration {
        Duration::from_secs(value)
    }

    fn ranges(lead: f64) -> Vec<TimeRange> {
        vec![TimeRange::from_secs_f64(0.0, lead)]
    }

    #[test]
    fn test_buffered_lead() {
        let buffered = vec![
            TimeRange::from_secs_f64(0.0, 4.0),
            TimeRange::from_secs_f64(10.0, 18.0),
        ];

        assert_eq!(buffered_lead(secs(1), &buffered), secs(3));
        assert_eq!(buffered_lead(secs(12), &buffered), secs(6));
        assert_eq!(buffered_lead(secs(7), &buffered), Duration::ZERO);
        assert_eq!(buffered_lead(secs(0), &[]), Duration::ZERO);
    }

    #[test]
    fn test_polls_until_target() {
        let mut probe = BufferProbe::new(&AutoplayConfig::default());
        let readings = [0.0, 2.0, 5.0];

        let mut steps = Vec::new();
        for lead in readings {
            steps.push(probe.step(Duration::ZERO, Some(secs(60)), || ranges(lead)));
        }

        let poll = ProbeStep::Poll(Duration::from_millis(200));
        assert_eq!(steps, vec![poll, poll, ProbeStep::Play]);
        assert_eq!(probe.polls(), 3);
    }

    #[test]
    fn test_short_media_plays_without_polling() {
        let mut probe = BufferProbe::new(&AutoplayConfig::default());
        let step = probe.step(Duration::ZERO, Some(secs(3)), || panic!("buffered queried"));
        assert_eq!(step, ProbeStep::Play);
        assert_eq!(probe.polls(), 0);
    }

    #[test]
    fn test_unknown_duration_plays_without_polling() {
        let mut probe = BufferProbe::new(&AutoplayConfig::default());
        let step = probe.step(Duration::ZERO, None, || panic!("buffered queried"));
        assert_eq!(step, ProbeStep::Play);
    }

    #[test]
    fn test_duration_equal_to_target_is_short() {
        let mut probe = BufferProbe::new(&AutoplayConfig::default());
        assert_eq!(probe.step(Duration::ZERO, Some(secs(5)), Vec::new), ProbeStep::Play);
    }

    #[test]
    fn test_initial_delay_is_min_display() {
        let probe = BufferProbe::new(&AutoplayConfig::default());
        assert_eq!(probe.initial_delay(), Duration::from_millis(2000));
    }
}
