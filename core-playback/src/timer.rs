//! Cancellable single-shot timers.
//!
//! A [`TimerSlot`] holds at most one pending timer of its kind. Arming spawns
//! a `tokio` sleep that posts [`Input::Timer`] back into the controller's input
//! queue. Every arm or cancel bumps the slot's generation, and a fired input
//! is only [accepted](TimerSlot::accept) when its generation is still the
//! live one, so a timer that was cancelled (even one whose input is already
//! queued) can never act.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::controller::Input;

/// Which slot a timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Closes the application after inactivity.
    Idle,
    /// Drives the auto-play buffer probe.
    Autoplay,
}

/// Posted into the input queue when a timer elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub kind: TimerKind,
    pub generation: u64,
}

pub struct TimerSlot {
    kind: TimerKind,
    generation: u64,
    armed_for: Option<Duration>,
    task: Option<JoinHandle<()>>,
    inputs: UnboundedSender<Input>,
}

impl TimerSlot {
    pub fn new(kind: TimerKind, inputs: UnboundedSender<Input>) -> Self {
        Self {
            kind,
            generation: 0,
            armed_for: None,
            task: None,
            inputs,
        }
    }

    /// Arm the slot, replacing whatever was pending.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, after: Duration) {
        self.cancel();

        let fired = TimerFired {
            kind: self.kind,
            generation: self.generation,
        };
        let inputs = self.inputs.clone();

        trace!(kind = ?self.kind, generation = self.generation, ?after, "Arming timer");
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            // The receiver is gone only during shutdown.
            let _ = inputs.send(Input::Timer(fired));
        }));
        self.armed_for = Some(after);
    }

    /// Disarm the slot. Any already-queued firing becomes stale.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.armed_for = None;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Returns `true` if `fired` is the live timer of this slot, consuming it.
    pub fn accept(&mut self, fired: TimerFired) -> bool {
        if fired.kind != self.kind || fired.generation != self.generation || self.task.is_none() {
            return false;
        }

        self.task = None;
        self.armed_for = None;
        self.generation = self.generation.wrapping_add(1);
        true
    }

    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    /// Duration the pending timer was armed with.
    pub fn armed_for(&self) -> Option<Duration> {
        self.armed_for
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
