use bevy_ecs::resource::Resource;
use glam::{IVec2, Vec2};
use pathfinding::prelude::bfs;
use smallvec::SmallVec;
use tracing::debug;

use crate::constants::CELL_SIZE;
use crate::error::ParseError;
use crate::map::direction::Direction;
use crate::map::parser::MapTileParser;
use crate::map::{MapTile, TraversalFlags};

/// The playfield: a grid of tiles plus the spawn and home cells found in the layout.
///
/// Cells are addressed with `IVec2` (x right, y down). Entities live in pixel space, where
/// the centre of cell `(x, y)` is at `((x + 0.5) * CELL_SIZE, (y + 0.5) * CELL_SIZE)`.
#[derive(Resource, Debug, Clone)]
pub struct Board {
    width: usize,
    height: usize,
    tiles: Vec<MapTile>,
    /// Pac-Man's starting cell.
    pub pacman_start: IVec2,
    /// Ghost starting cells, one per ghost.
    pub ghost_starts: SmallVec<[IVec2; 4]>,
    /// The cell retreating ghosts return to.
    pub home: IVec2,
}

impl Board {
    /// Parses a raw layout into a board.
    pub fn new(raw_board: &[&str]) -> Result<Self, ParseError> {
        let parsed = MapTileParser::parse_board(raw_board)?;
        let board = Self {
            width: parsed.width,
            height: parsed.height,
            tiles: parsed.tiles,
            pacman_start: parsed.pacman_start,
            ghost_starts: parsed.ghost_starts,
            home: parsed.home,
        };
        debug!(
            width = board.width,
            height = board.height,
            pellets = board.pellet_count(),
            ghosts = board.ghost_starts.len(),
            "Board parsed"
        );
        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the tile at a cell. Anything outside the board is a wall.
    pub fn tile(&self, cell: IVec2) -> MapTile {
        if cell.x < 0 || cell.y < 0 || cell.x as usize >= self.width || cell.y as usize >= self.height {
            return MapTile::Wall;
        }
        self.tiles[cell.y as usize * self.width + cell.x as usize]
    }

    /// Whether an entity with the given traversal flags may enter the cell.
    pub fn can_enter(&self, cell: IVec2, flags: TraversalFlags) -> bool {
        self.tile(cell).traversal_flags().contains(flags)
    }

    /// The pixel position of the centre of a cell.
    pub fn cell_center(cell: IVec2) -> Vec2 {
        (cell.as_vec2() + Vec2::splat(0.5)) * CELL_SIZE
    }

    /// The cell containing a pixel position.
    pub fn cell_of(position: Vec2) -> IVec2 {
        (position / CELL_SIZE).floor().as_ivec2()
    }

    /// Iterates over every pellet and power-up cell in reading order.
    pub fn items(&self) -> impl Iterator<Item = (IVec2, MapTile)> + '_ {
        self.tiles.iter().enumerate().filter_map(|(index, tile)| match tile {
            MapTile::Pellet | MapTile::PowerUp => {
                let cell = IVec2::new((index % self.width) as i32, (index / self.width) as i32);
                Some((cell, *tile))
            }
            _ => None,
        })
    }

    /// The number of regular pellets on a full board.
    pub fn pellet_count(&self) -> usize {
        self.tiles.iter().filter(|tile| **tile == MapTile::Pellet).count()
    }

    /// Length in steps of the shortest path between two cells.
    ///
    /// `None` when the target cannot be reached with the given traversal flags.
    pub fn path_length(&self, from: IVec2, to: IVec2, flags: TraversalFlags) -> Option<usize> {
        let path = bfs(
            &from,
            |&cell| {
                Direction::DIRECTIONS
                    .iter()
                    .map(move |direction| cell + direction.as_ivec2())
                    .filter(|next| self.can_enter(*next, flags))
                    .collect::<SmallVec<[IVec2; 4]>>()
            },
            |&cell| cell == to,
        )?;
        Some(path.len() - 1)
    }
}
