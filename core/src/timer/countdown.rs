//! Countdown engine for sitting sessions.

use super::TimerStatus;

/// Down-counting timer from a configured duration to zero.
///
/// Invariants: `remaining <= duration`; once `remaining` hits zero the
/// status is `Completed` and no further ticks happen until a reset.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    duration: u32,
    remaining: u32,
    status: TimerStatus,
}

impl CountdownTimer {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration: duration_secs,
            remaining: duration_secs,
            status: TimerStatus::Idle,
        }
    }

    /// Idle or Paused → Running. No-op from Running or Completed.
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

    /// Back to Idle with the full configured duration, from any state.
    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.status = TimerStatus::Idle;
    }

    /// Alias of [`reset`](Self::reset); both names are part of the
    /// command surface the presentation layer binds to.
    pub fn stop(&mut self) {
        self.reset();
    }

    /// Replace the configured duration. While Idle the remaining time
    /// follows immediately; otherwise the new value applies on the next
    /// reset.
    pub fn set_duration(&mut self, duration_secs: u32) {
        self.duration = duration_secs;
        if self.status == TimerStatus::Idle {
            self.remaining = duration_secs;
        }
    }

    /// Advance by one second. Returns true on the tick that completes the
    /// countdown; at most once per run.
    pub fn tick(&mut self) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }
        if self.remaining <= 1 {
            self.remaining = 0;
            self.status = TimerStatus::Completed;
            return true;
        }
        self.remaining -= 1;
        false
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration
    }

    /// Completion percentage in [0, 100]. Zero for a zero duration.
    /// Shrinking the duration mid-run leaves `remaining > duration` until
    /// the next reset, so the elapsed share saturates at zero.
    pub fn progress(&self) -> f32 {
        if self.duration == 0 {
            return 0.0;
        }
        let elapsed = self.duration.saturating_sub(self.remaining);
        (elapsed as f32 / self.duration as f32 * 100.0).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_run_completes_exactly_once() {
        let mut timer = CountdownTimer::new(3);
        timer.start();

        assert!(!timer.tick());
        assert!(!timer.tick());
        assert!(timer.tick());

        assert_eq!(timer.status(), TimerStatus::Completed);
        assert_eq!(timer.remaining_secs(), 0);
        assert_eq!(timer.progress(), 100.0);

        // Completed is terminal until reset
        assert!(!timer.tick());
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn pause_and_resume_lose_nothing() {
        let mut timer = CountdownTimer::new(10);
        timer.start();
        timer.tick();
        timer.tick();
        timer.pause();

        // Ticks while paused are ignored
        timer.tick();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 8);

        timer.start();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 7);
    }

    #[test]
    fn start_is_noop_while_running_or_completed() {
        let mut timer = CountdownTimer::new(1);
        timer.start();
        timer.start();
        assert_eq!(timer.status(), TimerStatus::Running);
        timer.tick();
        timer.start();
        assert_eq!(timer.status(), TimerStatus::Completed);
    }

    #[test]
    fn pause_is_noop_unless_running() {
        let mut timer = CountdownTimer::new(5);
        timer.pause();
        assert_eq!(timer.status(), TimerStatus::Idle);
    }

    #[test]
    fn reset_restores_from_any_state() {
        let mut timer = CountdownTimer::new(5);
        timer.start();
        timer.tick();
        timer.reset();
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.remaining_secs(), 5);

        timer.start();
        timer.pause();
        timer.stop();
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.remaining_secs(), 5);
    }

    #[test]
    fn set_duration_applies_immediately_only_while_idle() {
        let mut timer = CountdownTimer::new(10);
        timer.set_duration(20);
        assert_eq!(timer.remaining_secs(), 20);
        assert_eq!(timer.duration_secs(), 20);

        timer.start();
        timer.tick();
        timer.set_duration(5);
        assert_eq!(timer.remaining_secs(), 19);
        assert_eq!(timer.duration_secs(), 5);

        timer.reset();
        assert_eq!(timer.remaining_secs(), 5);
    }

    #[test]
    fn progress_tracks_elapsed_share() {
        let mut timer = CountdownTimer::new(4);
        assert_eq!(timer.progress(), 0.0);
        timer.start();
        timer.tick();
        assert_eq!(timer.progress(), 25.0);
        timer.tick();
        assert_eq!(timer.progress(), 50.0);
    }

    #[test]
    fn zero_duration_progress_is_zero() {
        let timer = CountdownTimer::new(0);
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn progress_stays_in_range_after_shrinking_duration_mid_run() {
        let mut timer = CountdownTimer::new(10);
        timer.start();
        timer.tick();
        timer.set_duration(5);

        // remaining (9) exceeds the new duration (5) until reset
        assert_eq!(timer.progress(), 0.0);

        timer.reset();
        timer.start();
        timer.tick();
        assert_eq!(timer.progress(), 20.0);
    }
}
