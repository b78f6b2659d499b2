use bevy_ecs::{
    query::With,
    system::{Query, Res},
};

use crate::{
    map::{board::Board, TraversalFlags},
    sprites::{GameSprite, PacmanSprite},
    systems::{
        components::{Appearance, BufferedDirection, DeltaTime, Pacman, PlayerControlled, Position, Velocity},
        movement::{advance, frame_distance},
    },
};

/// Executes frame-by-frame movement for Pac-Man.
///
/// A buffered direction is taken at the first cell centre where it is open, and kept until
/// then so turns can be requested ahead of an intersection. Reversing needs no centre and
/// is applied immediately. Pac-Man stops against walls and stays put until the player picks
/// an open direction.
pub fn player_movement_system(
    board: Res<Board>,
    delta_time: Res<DeltaTime>,
    mut players: Query<
        (
            &Pacman,
            &mut Position,
            &mut Velocity,
            &mut BufferedDirection,
            &mut Appearance,
        ),
        With<PlayerControlled>,
    >,
) {
    for (pacman, mut position, mut velocity, mut buffered_direction, mut appearance) in players.iter_mut() {
        if pacman.shrinking {
            continue;
        }

        if let Some(wanted) = buffered_direction.0 {
            if velocity.moving && wanted == velocity.direction.opposite() {
                velocity.direction = wanted;
                buffered_direction.0 = None;
            }
        }

        let distance = frame_distance(velocity.speed, &delta_time);
        let buffered = &mut buffered_direction.0;
        advance(
            &board,
            TraversalFlags::PACMAN,
            &mut position.0,
            &mut velocity,
            distance,
            |cell, current| {
                if let Some(wanted) = *buffered {
                    if board.can_enter(cell + wanted.as_ivec2(), TraversalFlags::PACMAN) {
                        *buffered = None;
                        return Some(wanted);
                    }
                }
                current.moving.then_some(current.direction)
            },
        );

        appearance.0 = GameSprite::Pacman(PacmanSprite::Moving(velocity.direction));
    }
}
