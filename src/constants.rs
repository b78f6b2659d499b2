//! This module contains all the constants used by the engine.

use std::time::Duration;

/// The default frame duration (60 frames per second).
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The number of frames per second that speeds are expressed against.
///
/// Speeds are stored as pixels-per-frame at this rate and scaled by the real delta time.
pub const BASE_FRAME_RATE: f32 = 60.0;

/// The size of each cell, in pixels.
pub const CELL_SIZE: f32 = 32.0;

/// Starting number of lives for a new game.
pub const INITIAL_LIVES: u8 = 3;

/// Default length of the shared scared window.
pub const SCARED_DURATION: Duration = Duration::from_millis(7000);
/// Amount the scared window shrinks by each time a board is cleared.
pub const SCARED_DURATION_STEP: Duration = Duration::from_millis(1000);
/// The scared window never shrinks below this.
pub const SCARED_DURATION_FLOOR: Duration = Duration::from_millis(1000);
/// How long a captured ghost stays in retreat before resuming the chase.
pub const RETREAT_DURATION: Duration = Duration::from_millis(5000);
/// Length of each scatter phase of the global ghost cycle.
pub const SCATTER_DURATION: Duration = Duration::from_millis(7000);
/// Length of each chase phase of the global ghost cycle.
pub const CHASE_DURATION: Duration = Duration::from_millis(20000);
/// Length of Pac-Man's death animation, after which the round restarts or the game ends.
pub const DEATH_ANIMATION_DURATION: Duration = Duration::from_millis(1500);

/// Constants for entity collision radii, in pixels.
pub mod collider {
    /// Radius of Pac-Man.
    pub const PACMAN_RADIUS: f32 = 15.0;
    /// Radius of a ghost.
    pub const GHOST_RADIUS: f32 = 15.0;
    /// Radius of a regular pellet.
    pub const PELLET_RADIUS: f32 = 3.0;
    /// Radius of a power-up.
    pub const POWER_UP_RADIUS: f32 = 8.0;
}

/// Movement speeds, in pixels per frame at [`BASE_FRAME_RATE`](super::BASE_FRAME_RATE).
pub mod speed {
    pub const PACMAN: f32 = 4.0;
    pub const GHOST_CHASE: f32 = 2.0;
    pub const GHOST_SCARED: f32 = 1.0;
    pub const GHOST_RETREATING: f32 = 8.0;
}

/// Points awarded for each kind of event.
pub mod score {
    pub const PELLET: u32 = 10;
    pub const POWER_UP: u32 = 50;
    /// Points for the first ghost captured in a scared window; doubles for each further capture.
    pub const GHOST_BASE: u32 = 200;
}

/// Probability that a chasing ghost ignores Pac-Man and picks a random turn.
pub const GHOST_RANDOMNESS: f64 = 0.2;

/// The raw layout of the game board, as a 2D array of characters.
///
/// - `#` wall, `.` pellet, `o` power-up, `=` ghost door
/// - `P` Pac-Man's spawn, `G` a ghost spawn, `H` the ghost home tile
pub const RAW_BOARD: [&str; 30] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###==### ##.######",
    "######.## #GG  GG# ##.######",
    "######.   #  H   #   .######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......P .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];
