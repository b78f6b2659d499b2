//! A headless real-time Pac-Man engine.
//!
//! The engine owns movement, ghost behaviour, collisions, scoring and the end-of-game
//! report. Hosts feed it frame deltas and key presses, and drain render and audio cues.

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod game;
pub mod logging;
pub mod map;
pub mod platform;
pub mod report;
pub mod session;
pub mod sprites;
pub mod systems;
pub mod timer;
