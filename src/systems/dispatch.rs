//! The single consumer of collision events.
//!
//! Every gameplay mutation caused by a collision happens here, in the order the collision
//! system wrote its events.

use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    query::{With, Without},
    system::{Query, Res, ResMut},
};
use tracing::{debug, info, warn};

use crate::{
    config::Tuning,
    events::{AudioEvent, CollisionEvent, RenderCue},
    session::GameSession,
    sprites::{GameSprite, PacmanSprite},
    systems::{
        components::{
            Appearance, Ghost, GhostMode, Item, ItemKind, ModeTrigger, Pacman, PlayerControlled, RetreatTimer, ScaredTimer,
            Velocity,
        },
        ghost::enter_mode,
        state::GameStage,
    },
};

type GhostQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static Ghost,
        &'static mut GhostMode,
        &'static mut Velocity,
        &'static mut Appearance,
        &'static mut RetreatTimer,
    ),
    Without<PlayerControlled>,
>;

/// Applies this frame's collision events.
///
/// A cleared board or a lethal hit halts the frame: ghost events after it are dropped. A
/// ghost contact is resolved against the ghost's mode at the time it is handled, so a ghost
/// frightened by a power-up eaten in the same frame is captured rather than lethal.
#[allow(clippy::too_many_arguments)]
pub fn collision_dispatch_system(
    mut events: EventReader<CollisionEvent>,
    tuning: Res<Tuning>,
    mut session: ResMut<GameSession>,
    mut stage: ResMut<GameStage>,
    mut scared: ResMut<ScaredTimer>,
    mut items: Query<&mut Item>,
    mut ghosts: GhostQuery,
    mut pacman: Query<(&mut Pacman, &mut Appearance), With<PlayerControlled>>,
    mut cues: EventWriter<RenderCue>,
    mut audio: EventWriter<AudioEvent>,
) {
    if !stage.is_playing() {
        events.clear();
        return;
    }

    let mut halted = false;
    for event in events.read() {
        if halted {
            debug!(?event, "Collision dropped after the frame was halted");
            continue;
        }

        match *event {
            CollisionEvent::PelletEaten(entity) => {
                if eat(&mut items, entity, ItemKind::Pellet, &mut session) {
                    session.pellets_collected += 1;
                    audio.write(AudioEvent::PlayEat);
                }
            }
            CollisionEvent::PowerUpEaten(entity) => {
                if eat(&mut items, entity, ItemKind::PowerUp, &mut session) {
                    debug!(scared_ms = scared.0.duration().as_millis() as u64, "Power-up eaten");
                    scared.0.start();
                    for (ghost, mut mode, mut velocity, mut appearance, _) in ghosts.iter_mut() {
                        let next = mode.next(ModeTrigger::PowerUpEaten);
                        enter_mode(*ghost, &mut mode, &mut velocity, &mut appearance, next, &mut cues);
                    }
                    audio.write(AudioEvent::PlayPowerUp);
                }
            }
            CollisionEvent::BoardCleared => {
                info!(level = session.level, score = session.score, "Board cleared");
                *stage = GameStage::LevelCleared;
                halted = true;
            }
            CollisionEvent::PacmanHit(entity) | CollisionEvent::GhostCaptured(entity) => {
                let Ok((ghost, mut mode, mut velocity, mut appearance, mut retreat)) = ghosts.get_mut(entity) else {
                    warn!(?entity, "Collision with an entity that is not a ghost");
                    continue;
                };

                match *mode {
                    GhostMode::Chase => {
                        info!(ghost = %ghost, "Pac-Man caught");
                        *stage = GameStage::dying(&tuning);
                        for (mut pacman, mut pacman_appearance) in pacman.iter_mut() {
                            pacman.shrinking = true;
                            pacman_appearance.0 = GameSprite::Pacman(PacmanSprite::Dying);
                        }
                        cues.write(RenderCue::DeathAnimation);
                        audio.write(AudioEvent::PlayDeath);
                        audio.write(AudioEvent::StopGhostAudio);
                        halted = true;
                    }
                    GhostMode::Scared => {
                        let points = session.next_capture_points();
                        session.add_score(points);
                        session.kill_count += 1;
                        debug!(ghost = %ghost, points, kill_count = session.kill_count, "Ghost captured");

                        let next = mode.next(ModeTrigger::Collided);
                        enter_mode(*ghost, &mut mode, &mut velocity, &mut appearance, next, &mut cues);
                        retreat.0.set_duration(tuning.retreat_duration);
                        retreat.0.start();

                        cues.write(RenderCue::GhostCaptured { ghost: *ghost, points });
                        audio.write(AudioEvent::PlayGhostEaten);
                    }
                    GhostMode::Retreating => {}
                }
            }
        }
    }
}

/// Marks an item eaten and scores it. Returns false if it was already eaten.
fn eat(items: &mut Query<&mut Item>, entity: Entity, kind: ItemKind, session: &mut GameSession) -> bool {
    let Ok(mut item) = items.get_mut(entity) else {
        warn!(?entity, ?kind, "Collision with an entity that is not an item");
        return false;
    };
    if item.eaten {
        return false;
    }

    item.eaten = true;
    session.add_score(kind.score_value());
    true
}
