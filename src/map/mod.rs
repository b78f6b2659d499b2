//! This module defines the game board and provides functions for interacting with it.

use bitflags::bitflags;

pub mod board;
pub mod direction;
pub mod parser;

bitflags! {
    /// Which kinds of entity may enter a tile.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TraversalFlags: u8 {
        const PACMAN = 1 << 0;
        const GHOST = 1 << 1;

        /// Convenience flag for tiles any entity may enter.
        const ALL = Self::PACMAN.bits() | Self::GHOST.bits();
    }
}

/// An enum representing the different types of tiles on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapTile {
    /// Open floor with nothing on it.
    Empty,
    /// A wall tile.
    Wall,
    /// A regular pellet.
    Pellet,
    /// A power-up, which scares the ghosts.
    PowerUp,
    /// The door of the ghost house. Only ghosts may pass.
    GhostDoor,
}

impl MapTile {
    /// Returns the traversal flags of entities allowed onto this tile.
    pub fn traversal_flags(self) -> TraversalFlags {
        match self {
            MapTile::Wall => TraversalFlags::empty(),
            MapTile::GhostDoor => TraversalFlags::GHOST,
            MapTile::Empty | MapTile::Pellet | MapTile::PowerUp => TraversalFlags::ALL,
        }
    }
}
