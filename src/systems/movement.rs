//! Grid-locked movement shared by Pac-Man and the ghosts.
//!
//! Entities live in pixel space but only ever travel along the line between two cell
//! centres. Headings may change only at a centre, where a caller-supplied `decide` closure
//! picks the next direction.

use glam::{IVec2, Vec2};

use crate::constants::{BASE_FRAME_RATE, CELL_SIZE};
use crate::map::board::Board;
use crate::map::direction::Direction;
use crate::map::TraversalFlags;
use crate::systems::components::{DeltaTime, Velocity};

/// Positions closer than this to a cell centre count as being on it.
const EPSILON: f32 = 0.01;

/// Upper bound on centre-to-centre hops in one call. Only reached with absurd frame deltas.
const MAX_HOPS: usize = 64;

/// Distance in pixels an entity with `speed` covers during this frame.
pub fn frame_distance(speed: f32, delta_time: &DeltaTime) -> f32 {
    speed * BASE_FRAME_RATE * delta_time.seconds
}

/// Distance from `position` to the next cell centre ahead when heading in `direction`.
///
/// Zero when the position is already on a centre.
pub fn distance_to_center(position: Vec2, direction: Direction) -> f32 {
    let along = ((position / CELL_SIZE) - Vec2::splat(0.5)).dot(direction.as_vec2());
    let fraction = along - along.floor();
    let remaining = (1.0 - fraction) * CELL_SIZE;
    if fraction * CELL_SIZE <= EPSILON || remaining <= EPSILON {
        0.0
    } else {
        remaining
    }
}

/// Moves an entity up to `distance` pixels along the grid.
///
/// Every time the entity stands on a cell centre, `decide` is asked which way to go next,
/// given the cell and the current velocity. Returning `None`, or a direction into a cell
/// the entity may not enter, parks the entity on the centre with `moving` cleared.
pub fn advance<F>(
    board: &Board,
    flags: TraversalFlags,
    position: &mut Vec2,
    velocity: &mut Velocity,
    mut distance: f32,
    mut decide: F,
) where
    F: FnMut(IVec2, &Velocity) -> Option<Direction>,
{
    for _ in 0..MAX_HOPS {
        if distance <= EPSILON {
            return;
        }

        let to_center = distance_to_center(*position, velocity.direction);
        let step = if to_center == 0.0 {
            let cell = Board::cell_of(*position);
            *position = Board::cell_center(cell);

            let next = decide(cell, velocity).filter(|direction| board.can_enter(cell + direction.as_ivec2(), flags));
            match next {
                Some(direction) => {
                    velocity.direction = direction;
                    velocity.moving = true;
                }
                None => {
                    velocity.moving = false;
                    return;
                }
            }
            distance.min(CELL_SIZE)
        } else {
            distance.min(to_center)
        };

        *position += velocity.direction.as_vec2() * step;
        distance -= step;
    }
}
