//! Timing engines
//!
//! Two 1 Hz tick-driven state machines:
//! - [`CountdownTimer`]: counts a fixed duration down to zero, then
//!   completes (sitting sessions)
//! - [`StopwatchTimer`]: counts up without bound (standing sessions)
//!
//! Neither engine owns a clock. The session orchestrator drives them by
//! calling `tick()` once per second while they are running, so the logic
//! stays deterministic and testable.

mod countdown;
mod stopwatch;

pub use countdown::CountdownTimer;
pub use stopwatch::StopwatchTimer;

/// Lifecycle status shared by both engines. A stopwatch never enters
/// `Completed`; only the countdown does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

impl TimerStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, TimerStatus::Running)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Completed => "completed",
        }
    }
}

/// Format whole seconds as zero-padded `MM:SS`. Durations of 6000 s or
/// more widen the minutes field instead of rolling over into hours.
pub fn format_mm_ss(secs: u64) -> String {
    let m = secs / 60;
    let s = secs % 60;
    format!("{:02}:{:02}", m, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_pads_both_fields() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(65), "01:05");
        assert_eq!(format_mm_ss(45 * 60), "45:00");
    }

    #[test]
    fn format_widens_past_99_minutes() {
        assert_eq!(format_mm_ss(6000), "100:00");
        assert_eq!(format_mm_ss(6061), "101:01");
    }
}
