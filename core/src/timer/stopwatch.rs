//! Elapsed-time engine for standing sessions.

use super::TimerStatus;

/// Up-counting timer from zero, unbounded. Mirrors [`super::CountdownTimer`]
/// minus completion.
#[derive(Debug, Clone, Default)]
pub struct StopwatchTimer {
    elapsed: u64,
    status: TimerStatus,
}

impl StopwatchTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle or Paused → Running. No-op while Running.
    pub fn start(&mut self) {
        if matches!(self.status, TimerStatus::Idle | TimerStatus::Paused) {
            self.status = TimerStatus::Running;
        }
    }

    /// Running → Paused. No-op otherwise.
    pub fn pause(&mut self) {
        if self.status == TimerStatus::Running {
            self.status = TimerStatus::Paused;
        }
    }

    /// Back to Idle at zero, from any state.
    pub fn reset(&mut self) {
        self.elapsed = 0;
        self.status = TimerStatus::Idle;
    }

    /// Alias of [`reset`](Self::reset).
    pub fn stop(&mut self) {
        self.reset();
    }

    /// Advance by one second while running.
    pub fn tick(&mut self) {
        if self.status == TimerStatus::Running {
            self.elapsed += 1;
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed
    }
}
