use bevy_ecs::{
    event::EventWriter,
    query::{With, Without},
    system::{Query, Res, ResMut},
};
use glam::IVec2;
use rand::{seq::IndexedRandom, Rng};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::{
    config::Tuning,
    events::{AudioEvent, RenderCue},
    map::{board::Board, direction::Direction, TraversalFlags},
    session::GameSession,
    sprites::{GameSprite, GhostSprite},
    systems::{
        components::{
            Appearance, DeltaTime, GameRng, Ghost, GhostMode, GhostPhase, ModeTrigger, PhaseTimer, PlayerControlled,
            Position, RetreatTimer, ScaredTimer, Velocity,
        },
        movement::{advance, frame_distance},
    },
};

/// Moves a ghost into `mode`, reassigning its speed and sprite.
///
/// Emits a [`RenderCue::GhostModeChanged`] when the mode actually changes. Returns whether
/// it did.
pub fn enter_mode(
    ghost: Ghost,
    mode: &mut GhostMode,
    velocity: &mut Velocity,
    appearance: &mut Appearance,
    next: GhostMode,
    cues: &mut EventWriter<RenderCue>,
) -> bool {
    if *mode == next {
        return false;
    }

    debug!(ghost = %ghost, from = %mode, to = %next, "Ghost mode changed");
    *mode = next;
    velocity.speed = next.speed();
    appearance.0 = GameSprite::Ghost(GhostSprite::for_mode(ghost, next, velocity.direction));
    cues.write(RenderCue::GhostModeChanged {
        ghost,
        mode: next,
        sprite: appearance.0,
    });
    true
}

/// Picks a ghost's next heading at a cell centre.
///
/// Ghosts never turn back unless the cell is a dead end. With a target they take the
/// open direction with the shortest path to it, except that with probability `randomness`
/// they pick any open direction instead. Without a target every pick is random.
pub fn steer<R: Rng>(
    board: &Board,
    cell: IVec2,
    heading: Direction,
    target: Option<IVec2>,
    randomness: f64,
    rng: &mut R,
) -> Option<Direction> {
    let reverse = heading.opposite();
    let options: SmallVec<[Direction; 4]> = Direction::DIRECTIONS
        .into_iter()
        .filter(|direction| *direction != reverse && board.can_enter(cell + direction.as_ivec2(), TraversalFlags::GHOST))
        .collect();

    if options.is_empty() {
        if board.can_enter(cell + reverse.as_ivec2(), TraversalFlags::GHOST) {
            trace!(?cell, direction = %reverse, "Ghost forced to reverse direction");
            return Some(reverse);
        }
        warn!(?cell, "Ghost stuck with no available directions");
        return None;
    }

    match target {
        Some(target) if !rng.random_bool(randomness.clamp(0.0, 1.0)) => options.iter().copied().min_by_key(|direction| {
            board
                .path_length(cell + direction.as_ivec2(), target, TraversalFlags::GHOST)
                .unwrap_or(usize::MAX)
        }),
        _ => options.choose(rng).copied(),
    }
}

/// The cell a ghost heads for during a scatter phase: its own corner, inside the border.
///
/// Blinky takes the top right, Pinky the top left, Inky the bottom right and Clyde the
/// bottom left.
pub fn scatter_target(ghost: Ghost, board: &Board) -> IVec2 {
    let right = (board.width() as i32 - 2).max(0);
    let bottom = (board.height() as i32 - 2).max(0);
    match ghost {
        Ghost::Blinky => IVec2::new(right, 1.min(bottom)),
        Ghost::Pinky => IVec2::new(1.min(right), 1.min(bottom)),
        Ghost::Inky => IVec2::new(right, bottom),
        Ghost::Clyde => IVec2::new(1.min(right), bottom),
    }
}

/// Advances the global scatter/chase cycle.
pub fn ghost_phase_system(delta_time: Res<DeltaTime>, mut cycle: ResMut<PhaseTimer>) {
    if cycle.tick(delta_time.duration) {
        debug!(phase = %cycle.phase, "Ghost phase changed");
    }
}

/// Autonomous ghost movement.
///
/// Chasing ghosts hunt Pac-Man's cell, or their corner during a scatter phase. Scared
/// ghosts wander, and retreating ghosts take the shortest path home and park there until
/// the mode timer system releases them.
pub fn ghost_movement_system(
    board: Res<Board>,
    tuning: Res<Tuning>,
    delta_time: Res<DeltaTime>,
    cycle: Res<PhaseTimer>,
    mut rng: ResMut<GameRng>,
    pacman: Query<&Position, With<PlayerControlled>>,
    mut ghosts: Query<(&Ghost, &GhostMode, &mut Position, &mut Velocity, &mut Appearance), Without<PlayerControlled>>,
) {
    let pacman_cell = pacman.iter().next().map(|position| Board::cell_of(position.0));
    let rng = &mut rng.0;

    for (ghost, mode, mut position, mut velocity, mut appearance) in ghosts.iter_mut() {
        let (target, randomness) = match mode {
            GhostMode::Chase => match cycle.phase {
                GhostPhase::Chase => (pacman_cell, tuning.ghost_randomness),
                GhostPhase::Scatter => (Some(scatter_target(*ghost, &board)), tuning.ghost_randomness),
            },
            GhostMode::Scared => (None, 1.0),
            GhostMode::Retreating => (Some(board.home), 0.0),
        };

        let distance = frame_distance(velocity.speed, &delta_time);
        advance(
            &board,
            TraversalFlags::GHOST,
            &mut position.0,
            &mut velocity,
            distance,
            |cell, current| {
                if *mode == GhostMode::Retreating && cell == board.home {
                    return None;
                }
                steer(&board, cell, current.direction, target, randomness, rng)
            },
        );

        appearance.0 = GameSprite::Ghost(GhostSprite::for_mode(*ghost, *mode, velocity.direction));
    }
}

/// Advances the scared window and every retreat timer, returning ghosts to the chase.
///
/// When the shared scared window ends, every scared ghost resumes the chase and the
/// session's kill count drops back to zero. A retreating ghost resumes the chase when its
/// own timer runs out or once it is parked on the home cell.
pub fn ghost_mode_timer_system(
    board: Res<Board>,
    delta_time: Res<DeltaTime>,
    mut scared: ResMut<ScaredTimer>,
    mut session: ResMut<GameSession>,
    mut ghosts: Query<(
        &Ghost,
        &mut GhostMode,
        &Position,
        &mut Velocity,
        &mut Appearance,
        &mut RetreatTimer,
    )>,
    mut cues: EventWriter<RenderCue>,
    mut audio: EventWriter<AudioEvent>,
) {
    let scared_expired = scared.0.tick(delta_time.duration);
    if scared_expired {
        debug!(kill_count = session.kill_count, "Scared window ended");
        session.kill_count = 0;
        audio.write(AudioEvent::ResumeGhostAudio);
    }

    for (ghost, mut mode, position, mut velocity, mut appearance, mut retreat) in ghosts.iter_mut() {
        let trigger = match *mode {
            GhostMode::Scared if scared_expired => Some(ModeTrigger::ScaredExpired),
            GhostMode::Retreating => {
                if retreat.0.tick(delta_time.duration) {
                    Some(ModeTrigger::RetreatExpired)
                } else if !velocity.moving && Board::cell_of(position.0) == board.home {
                    Some(ModeTrigger::ReachedHome)
                } else {
                    None
                }
            }
            _ => None,
        };

        if let Some(trigger) = trigger {
            trace!(ghost = %ghost, ?trigger, "Ghost mode trigger");
            let next = mode.next(trigger);
            enter_mode(*ghost, &mut mode, &mut velocity, &mut appearance, next, &mut cues);
            retreat.0.reset();
        }
    }
}
