//! A structured representation of every sprite the renderer may be asked to show.
//!
//! The engine never draws; it only tells the renderer which sprite an entity should use.
//! `GameSprite::to_path` gives the atlas path for a sprite so the host can look it up.

use crate::map::direction::Direction;
use crate::systems::components::{Ghost, GhostMode};

/// Represents the different sprites for Pac-Man.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacmanSprite {
    /// Pac-Man moving (or facing) a direction.
    Moving(Direction),
    /// The shrinking death animation.
    Dying,
}

/// Represents the different sprites for ghosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GhostSprite {
    /// The normal appearance of a ghost for a given type and direction.
    Normal(Ghost, Direction),
    /// The shared blue appearance of a scared ghost.
    Scared,
    /// The "eyes only" appearance of a ghost heading home.
    Eyes(Direction),
}

impl GhostSprite {
    /// The sprite a ghost uses in a given mode while heading in a given direction.
    pub fn for_mode(ghost: Ghost, mode: GhostMode, direction: Direction) -> Self {
        match mode {
            GhostMode::Chase => GhostSprite::Normal(ghost, direction),
            GhostMode::Scared => GhostSprite::Scared,
            GhostMode::Retreating => GhostSprite::Eyes(direction),
        }
    }
}

/// Represents the sprites for collectibles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MazeSprite {
    Pellet,
    PowerUp,
}

/// A top-level enum that encompasses all game sprites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSprite {
    Pacman(PacmanSprite),
    Ghost(GhostSprite),
    Maze(MazeSprite),
}

impl GameSprite {
    /// Generates the atlas path for the sprite.
    pub fn to_path(self) -> String {
        match self {
            GameSprite::Pacman(PacmanSprite::Moving(dir)) => format!("pacman/{}.png", dir.as_ref()),
            GameSprite::Pacman(PacmanSprite::Dying) => "pacman/dying.png".to_string(),
            GameSprite::Ghost(GhostSprite::Normal(ghost, dir)) => format!("ghost/{}/{}.png", ghost.as_ref(), dir.as_ref()),
            GameSprite::Ghost(GhostSprite::Scared) => "ghost/scared.png".to_string(),
            GameSprite::Ghost(GhostSprite::Eyes(dir)) => format!("ghost/eyes/{}.png", dir.as_ref()),
            GameSprite::Maze(MazeSprite::Pellet) => "maze/pellet.png".to_string(),
            GameSprite::Maze(MazeSprite::PowerUp) => "maze/power_up.png".to_string(),
        }
    }
}
