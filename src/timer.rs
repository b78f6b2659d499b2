//! A restartable countdown, polled once per tick.

use std::time::Duration;

/// A countdown that is advanced by frame deltas rather than by the wall clock.
///
/// Timers are reused: `start` rewinds and arms the timer, `reset` rewinds and disarms it.
/// The duration may be changed at any time and takes effect against the time already
/// elapsed. A timer only reports expiry once per run, on the tick that crosses the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    duration: Duration,
    elapsed: Duration,
    running: bool,
}

impl Timer {
    /// Creates a stopped timer with the given duration.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    /// Rewinds the timer and starts it running.
    pub fn start(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = true;
    }

    /// Rewinds the timer and stops it.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = false;
    }

    /// Advances a running timer by `dt`.
    ///
    /// Returns `true` exactly on the tick the timer expires; the timer is stopped afterwards.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if !self.running {
            return false;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.duration {
            self.running = false;
            return true;
        }
        false
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Time left before expiry; zero when stopped.
    pub fn remaining(&self) -> Duration {
        if self.running {
            self.duration.saturating_sub(self.elapsed)
        } else {
            Duration::ZERO
        }
    }
}
