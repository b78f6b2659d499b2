//! Map parsing functionality for converting raw board layouts into structured data.

use glam::IVec2;
use smallvec::SmallVec;

use crate::error::ParseError;
use crate::map::MapTile;

/// Represents the parsed data from a raw board layout.
#[derive(Debug)]
pub struct ParsedMap {
    /// Width of the board, in cells.
    pub width: usize,
    /// Height of the board, in cells.
    pub height: usize,
    /// The parsed tile layout, row-major.
    pub tiles: Vec<MapTile>,
    /// Pac-Man's starting cell.
    pub pacman_start: IVec2,
    /// Ghost starting cells, in board reading order.
    pub ghost_starts: SmallVec<[IVec2; 4]>,
    /// The cell retreating ghosts head back to.
    pub home: IVec2,
}

/// Parser for converting raw board layouts into structured map data.
pub struct MapTileParser;

impl MapTileParser {
    /// Parses a single character into a map tile.
    ///
    /// Spawn and home markers are open floor; their positions are tracked separately.
    pub fn parse_character(c: char) -> Result<MapTile, ParseError> {
        match c {
            '#' => Ok(MapTile::Wall),
            '.' => Ok(MapTile::Pellet),
            'o' => Ok(MapTile::PowerUp),
            '=' => Ok(MapTile::GhostDoor),
            ' ' | 'P' | 'G' | 'H' => Ok(MapTile::Empty),
            _ => Err(ParseError::UnknownCharacter(c)),
        }
    }

    /// Parses a raw board layout into structured map data.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty, contains unknown characters or rows of
    /// differing width, or does not have exactly one Pac-Man spawn, one ghost home, and
    /// between one and four ghost spawns.
    pub fn parse_board(raw_board: &[&str]) -> Result<ParsedMap, ParseError> {
        let width = raw_board.first().map(|row| row.chars().count()).ok_or(ParseError::Empty)?;
        if width == 0 {
            return Err(ParseError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * raw_board.len());
        let mut pacman_starts: SmallVec<[IVec2; 1]> = SmallVec::new();
        let mut ghost_starts: SmallVec<[IVec2; 4]> = SmallVec::new();
        let mut homes: SmallVec<[IVec2; 1]> = SmallVec::new();

        for (y, line) in raw_board.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ParseError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, character) in line.chars().enumerate() {
                tiles.push(Self::parse_character(character)?);

                let cell = IVec2::new(x as i32, y as i32);
                match character {
                    'P' => pacman_starts.push(cell),
                    'G' => ghost_starts.push(cell),
                    'H' => homes.push(cell),
                    _ => {}
                }
            }
        }

        if pacman_starts.len() != 1 {
            return Err(ParseError::InvalidPacmanSpawnCount(pacman_starts.len()));
        }
        if ghost_starts.is_empty() {
            return Err(ParseError::MissingGhostSpawn);
        }
        if ghost_starts.len() > 4 {
            return Err(ParseError::TooManyGhostSpawns(ghost_starts.len()));
        }
        if homes.len() != 1 {
            return Err(ParseError::InvalidHomeCount(homes.len()));
        }

        Ok(ParsedMap {
            width,
            height: raw_board.len(),
            tiles,
            pacman_start: pacman_starts[0],
            ghost_starts,
            home: homes[0],
        })
    }
}
