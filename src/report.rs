//! End-of-game reporting: the result payload and the score persistence seam.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PersistenceError;
use crate::session::{GameSession, PlayerIdentity};

/// The final result of a game, delivered once to the end-of-game callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameReport {
    pub score: u32,
    pub level: u32,
    /// Whole seconds played.
    pub duration: u64,
    /// True once at least one board was cleared.
    pub is_victory: bool,
    /// Ghosts captured in the scared window that was active when the game ended.
    pub kill_count: u32,
    /// `"Success: ..."` or `"Error: ..."`; absent for anonymous games.
    pub save_result: Option<String>,
    pub player: Option<PlayerIdentity>,
}

impl GameReport {
    /// Assembles the report for a finished session.
    pub fn from_session(session: &GameSession, save_result: Option<String>) -> Self {
        Self {
            score: session.score,
            level: session.level,
            duration: session.duration_secs(),
            is_victory: session.level > 1,
            kill_count: session.kill_count,
            save_result,
            player: session.player.clone(),
        }
    }
}

/// What gets handed to the score persister.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub username: String,
    pub score: u32,
}

/// Stores final scores somewhere outside the engine.
///
/// On success the returned message is reported back to the player verbatim.
pub trait ScorePersister {
    fn save(&mut self, record: &ScoreRecord) -> Result<String, PersistenceError>;
}

/// Saves the session's score if it has a player, folding any failure into the message.
///
/// Returns `None` for anonymous sessions; nothing is saved for them.
pub fn persist_score(persister: &mut dyn ScorePersister, session: &GameSession) -> Option<String> {
    let player = session.player.as_ref()?;
    let record = ScoreRecord {
        username: player.username.clone(),
        score: session.score,
    };

    match persister.save(&record) {
        Ok(message) => {
            debug!(username = %record.username, score = record.score, "Score saved");
            Some(format!("Success: {message}"))
        }
        Err(e) => {
            warn!(username = %record.username, error = %e, "Failed to save score");
            Some(format!("Error: {e}"))
        }
    }
}

/// Appends each record as one JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonLinesPersister {
    path: PathBuf,
}

impl JsonLinesPersister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScorePersister for JsonLinesPersister {
    fn save(&mut self, record: &ScoreRecord) -> Result<String, PersistenceError> {
        if record.username.trim().is_empty() {
            return Err(PersistenceError::Rejected("Username and score are required".into()));
        }

        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(&line)?;
        Ok("Score saved successfully".to_string())
    }
}

/// A persister for setups without score storage. Every save fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPersister;

impl ScorePersister for NullPersister {
    fn save(&mut self, _record: &ScoreRecord) -> Result<String, PersistenceError> {
        Err(PersistenceError::Rejected("Score storage is not configured".into()))
    }
}
