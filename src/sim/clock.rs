//! Run-time accounting across pauses
//!
//! The browser hands us wall-clock frame timestamps. Everything the run cares
//! about (score cadence, spawning, jump phases) is measured in *running* time:
//! wall time since the run began minus every paused stretch.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunClock {
    start_ms: f64,
    last_update_ms: f64,
    total_paused_ms: f64,
    pause_started_ms: Option<f64>,
}

impl RunClock {
    /// A clock for a run beginning at `now_ms`
    pub fn started(now_ms: f64) -> Self {
        Self {
            start_ms: now_ms,
            last_update_ms: now_ms,
            total_paused_ms: 0.0,
            pause_started_ms: None,
        }
    }

    /// Frame delta since the previous call (never negative)
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        let delta = (now_ms - self.last_update_ms).max(0.0);
        self.last_update_ms = self.last_update_ms.max(now_ms);
        delta
    }

    /// Running time at `now_ms`, excluding paused time (frozen while paused)
    pub fn elapsed(&self, now_ms: f64) -> f64 {
        let paused_now = self
            .pause_started_ms
            .map(|p| (now_ms - p).max(0.0))
            .unwrap_or(0.0);
        (now_ms - self.start_ms - self.total_paused_ms - paused_now).max(0.0)
    }

    pub fn pause(&mut self, now_ms: f64) {
        if self.pause_started_ms.is_none() {
            self.pause_started_ms = Some(now_ms);
        }
    }

    /// Fold the pause into the total and restart frame deltas from `now_ms`
    pub fn resume(&mut self, now_ms: f64) {
        if let Some(started) = self.pause_started_ms.take() {
            self.total_paused_ms += (now_ms - started).max(0.0);
            self.last_update_ms = now_ms;
        }
    }

    pub fn total_paused_ms(&self) -> f64 {
        self.total_paused_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_excludes_pause() {
        let mut clock = RunClock::started(1_000.0);
        assert_eq!(clock.elapsed(1_500.0), 500.0);

        clock.pause(1_500.0);
        // Frozen while paused
        assert_eq!(clock.elapsed(9_000.0), 500.0);

        clock.resume(11_500.0);
        assert_eq!(clock.total_paused_ms(), 10_000.0);
        assert_eq!(clock.elapsed(12_000.0), 1_000.0);
    }

    #[test]
    fn test_resume_resets_frame_delta() {
        let mut clock = RunClock::started(0.0);
        assert_eq!(clock.advance(16.0), 16.0);
        clock.pause(20.0);
        clock.resume(5_000.0);
        // The pause does not show up as one giant frame
        assert_eq!(clock.advance(5_016.0), 16.0);
    }

    #[test]
    fn test_advance_never_negative() {
        let mut clock = RunClock::started(100.0);
        assert_eq!(clock.advance(50.0), 0.0);
        assert_eq!(clock.advance(116.0), 16.0);
    }

    #[test]
    fn test_double_pause_keeps_first_timestamp() {
        let mut clock = RunClock::started(0.0);
        clock.pause(100.0);
        clock.pause(400.0);
        clock.resume(600.0);
        assert_eq!(clock.total_paused_ms(), 500.0);
        assert_eq!(clock.elapsed(700.0), 200.0);
    }
}
