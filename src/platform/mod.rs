//! Tick sources that drive the game loop.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::constants::LOOP_TIME;

/// Supplies frame deltas to the game loop.
pub trait TickSource {
    /// Blocks as needed and returns the time elapsed since the previous frame.
    fn next_tick(&mut self) -> Duration;
}

/// Paces frames at a fixed rate against the wall clock.
///
/// Sleeps off whatever is left of the frame budget and reports the real time that passed,
/// so slow frames produce larger deltas instead of slowing the game down.
#[derive(Debug)]
pub struct RealtimeTicks {
    frame_time: Duration,
    last_tick: Option<Instant>,
}

impl RealtimeTicks {
    pub fn new(frame_time: Duration) -> Self {
        Self {
            frame_time,
            last_tick: None,
        }
    }
}

impl Default for RealtimeTicks {
    fn default() -> Self {
        Self::new(LOOP_TIME)
    }
}

impl TickSource for RealtimeTicks {
    fn next_tick(&mut self) -> Duration {
        let Some(last_tick) = self.last_tick else {
            self.last_tick = Some(Instant::now());
            return self.frame_time;
        };

        let spent = last_tick.elapsed();
        if spent < self.frame_time {
            spin_sleep::sleep(self.frame_time - spent);
        } else {
            trace!(over = ?(spent - self.frame_time), "Frame over budget");
        }

        let now = Instant::now();
        self.last_tick = Some(now);
        now - last_tick
    }
}

/// Returns the same delta every frame without sleeping. Runs games as fast as the CPU
/// allows, for tests and headless play.
#[derive(Debug, Clone, Copy)]
pub struct FixedTicks {
    delta: Duration,
}

impl FixedTicks {
    pub fn new(delta: Duration) -> Self {
        Self { delta }
    }
}

impl Default for FixedTicks {
    fn default() -> Self {
        Self::new(LOOP_TIME)
    }
}

impl TickSource for FixedTicks {
    fn next_tick(&mut self) -> Duration {
        self.delta
    }
}
