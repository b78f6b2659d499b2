//! Per-game bookkeeping owned by the game loop.

use std::time::Duration;

use bevy_ecs::resource::Resource;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The player a game is being played for. Anonymous games have none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub username: String,
}

impl PlayerIdentity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Score, level and statistics for the game in progress.
#[derive(Resource, Debug, Clone)]
pub struct GameSession {
    /// Never decreases during a game.
    pub score: u32,
    /// Starts at 1 and grows by one per cleared board.
    pub level: u32,
    /// Ghosts captured during the current scared window.
    pub kill_count: u32,
    /// Regular pellets eaten on the current board.
    pub pellets_collected: u32,
    /// Wall-clock time the session began.
    pub started_at: OffsetDateTime,
    /// Time accumulated from frame deltas, paused frames included.
    pub elapsed: Duration,
    pub player: Option<PlayerIdentity>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(None)
    }
}

impl GameSession {
    pub fn new(player: Option<PlayerIdentity>) -> Self {
        Self {
            score: 0,
            level: 1,
            kill_count: 0,
            pellets_collected: 0,
            started_at: OffsetDateTime::now_utc(),
            elapsed: Duration::ZERO,
            player,
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Points for capturing the next ghost in the current scared window: 200, 400, 800...
    pub fn next_capture_points(&self) -> u32 {
        crate::constants::score::GHOST_BASE.saturating_mul(2u32.saturating_pow(self.kill_count))
    }

    /// Whole seconds played, measured from the recorded start.
    pub fn duration_secs(&self) -> u64 {
        self.elapsed.as_secs()
    }
}
