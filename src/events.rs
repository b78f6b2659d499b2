use bevy_ecs::entity::Entity;
use bevy_ecs::event::Event;

use crate::map::direction::Direction;
use crate::sprites::GameSprite;
use crate::systems::components::{Ghost, GhostMode};

/// Commands a host can feed into the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    MovePlayer(Direction),
    TogglePause,
}

/// Typed results of one frame's collision pass.
///
/// The collision system only detects; every mutation happens in the dispatcher that
/// consumes these, in the order they were written.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionEvent {
    /// Pac-Man touched an uneaten regular pellet.
    PelletEaten(Entity),
    /// Pac-Man touched an uneaten power-up.
    PowerUpEaten(Entity),
    /// The pellets eaten this frame were the last ones on the board.
    BoardCleared,
    /// Pac-Man touched a chasing ghost.
    PacmanHit(Entity),
    /// Pac-Man touched a scared ghost.
    GhostCaptured(Entity),
}

/// Observable cues for an external renderer.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderCue {
    /// A ghost changed mode; the renderer should swap to the given sprite.
    GhostModeChanged {
        ghost: Ghost,
        mode: GhostMode,
        sprite: GameSprite,
    },
    /// Points were awarded for capturing a ghost.
    GhostCaptured { ghost: Ghost, points: u32 },
    /// Pac-Man's death animation should start; gameplay is frozen until it ends.
    DeathAnimation,
    /// Actors were returned to their spawns after a death or a cleared board.
    Respawned,
    /// A board was cleared and play continues on the given level.
    LevelCleared { level: u32 },
    /// The game has ended and the result is being assembled.
    PleaseWait,
    /// The pause state changed.
    Paused(bool),
}

/// Sound effects for an external audio backend.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioEvent {
    PlayEat,
    PlayPowerUp,
    PlayGhostEaten,
    PlayDeath,
    /// The ghost siren should stop, e.g. while Pac-Man is dying.
    StopGhostAudio,
    /// The ghost siren may resume.
    ResumeGhostAudio,
}
