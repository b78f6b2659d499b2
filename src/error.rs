//! Centralized error types for the engine.
//!
//! This module defines all error types used throughout the crate,
//! providing a consistent error handling approach.

use std::io;

use bevy_ecs::event::Event;

/// Main error type for the engine.
///
/// Systems running inside the schedule cannot return errors, so they write this type as an
/// event instead; the game loop drains and logs them once per tick.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Error type for board layout parsing.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board: {0:?}")]
    UnknownCharacter(char),
    #[error("Board is empty")]
    Empty,
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("Board must have exactly one Pac-Man spawn, found {0}")]
    InvalidPacmanSpawnCount(usize),
    #[error("Board must have at least one ghost spawn")]
    MissingGhostSpawn,
    #[error("Board has {0} ghost spawns, at most 4 are supported")]
    TooManyGhostSpawns(usize),
    #[error("Board must have exactly one ghost home, found {0}")]
    InvalidHomeCount(usize),
}

/// Errors reported to callers of the engine's public control surface.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// A game is already running; a second loop would double-run every timer.
    #[error("A game is already running for this session")]
    ConcurrentStartRejected,
    /// A frame or command was submitted while no game is running.
    #[error("No game is running")]
    NotRunning,
}

/// Failures of the external score-persistence collaborator.
///
/// These never escape the engine; the reporter folds them into the result payload.
#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Extract(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Extract(Box::new(e))
    }
}

/// Result type for engine operations.
pub type GameResult<T> = Result<T, GameError>;
