use bevy_ecs::{
    event::Events,
    query::{With, Without},
    resource::Resource,
    world::World,
};
use tracing::{debug, info};

use crate::{
    config::Tuning,
    error::GameError,
    events::{AudioEvent, CollisionEvent, RenderCue},
    map::direction::Direction,
    session::GameSession,
    sprites::{GameSprite, GhostSprite, PacmanSprite},
    systems::{
        components::{
            Appearance, BufferedDirection, DeltaTime, Ghost, GhostMode, Item, Pacman, PhaseTimer, PlayerControlled,
            PlayerLives, Position, RetreatTimer, ScaredTimer, Spawn, Velocity,
        },
        input::InputQueue,
    },
    timer::Timer,
};

/// A resource to track the overall stage of the game from a high-level perspective.
#[derive(Resource, Debug, Default, PartialEq, Eq, Clone)]
pub enum GameStage {
    /// The main gameplay loop is active.
    #[default]
    Playing,
    /// Pac-Man was caught and the death animation is playing. Actors are frozen until the
    /// timer runs out, then the round restarts or the game ends.
    PlayerDying { respawn: Timer },
    /// The last pellet was eaten this frame; the board is restored on the stage step.
    LevelCleared,
    /// The game has ended and is waiting to be reported.
    GameOver,
}

impl GameStage {
    /// Starts the death sequence with a fresh respawn timer.
    pub fn dying(tuning: &Tuning) -> Self {
        let mut respawn = Timer::new(tuning.death_animation);
        respawn.start();
        GameStage::PlayerDying { respawn }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, GameStage::Playing)
    }
}

#[derive(Resource, Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum PauseState {
    #[default]
    Inactive,
    Active,
}

impl PauseState {
    pub fn active(&self) -> bool {
        matches!(self, PauseState::Active)
    }

    pub fn toggle(&mut self) {
        *self = match self {
            PauseState::Inactive => PauseState::Active,
            PauseState::Active => PauseState::Inactive,
        };
    }
}

/// Advances the high-level game stage.
///
/// Handles the end of the death animation (lose a life, then respawn or game over) and
/// cleared boards (next level or, past the final level, game over). Runs after the
/// collision dispatcher so a stage change made this frame is acted on this frame.
pub fn stage_system(world: &mut World) {
    let dt = world.resource::<DeltaTime>().duration;

    let respawn_due = {
        let mut stage = world.resource_mut::<GameStage>();
        match &mut *stage {
            GameStage::PlayerDying { respawn } => Some(respawn.tick(dt)),
            GameStage::LevelCleared => None,
            GameStage::Playing | GameStage::GameOver => return,
        }
    };

    match respawn_due {
        None => {
            next_level(world);
            return;
        }
        Some(false) => return,
        Some(true) => {}
    }

    let lives = {
        let mut lives = world.resource_mut::<PlayerLives>();
        lives.0 = lives.0.saturating_sub(1);
        lives.0
    };

    if lives == 0 {
        info!("Pac-Man has no lives left, game over");
        *world.resource_mut::<GameStage>() = GameStage::GameOver;
        return;
    }

    info!(lives, "Pac-Man respawning");
    reset_round(world);
    *world.resource_mut::<GameStage>() = GameStage::Playing;
    world.send_event(RenderCue::Respawned);
    world.send_event(AudioEvent::ResumeGhostAudio);
}

fn next_level(world: &mut World) {
    let level = {
        let mut session = world.resource_mut::<GameSession>();
        session.level += 1;
        session.level
    };
    let tuning = world.resource::<Tuning>().clone();

    if level > tuning.final_level {
        info!(level, "Final board cleared, game over");
        *world.resource_mut::<GameStage>() = GameStage::GameOver;
        return;
    }

    let scared_duration = tuning.scared_duration_for_level(level);
    info!(level, scared_ms = scared_duration.as_millis() as u64, "Board cleared, advancing level");
    world.resource_mut::<ScaredTimer>().0.set_duration(scared_duration);

    reset_board(world);
    reset_round(world);
    *world.resource_mut::<GameStage>() = GameStage::Playing;
    world.send_event(RenderCue::LevelCleared { level });
    world.send_event(RenderCue::Respawned);
}

/// Returns Pac-Man and every ghost to their spawns, ends any scared window and restarts the
/// ghost cycle from its first scatter phase.
pub fn reset_round(world: &mut World) {
    let mut players = world.query_filtered::<(
        &mut Pacman,
        &Spawn,
        &mut Position,
        &mut Velocity,
        &mut BufferedDirection,
        &mut Appearance,
    ), With<PlayerControlled>>();
    for (mut pacman, spawn, mut position, mut velocity, mut buffered, mut appearance) in players.iter_mut(world) {
        pacman.shrinking = false;
        position.0 = spawn.0;
        velocity.direction = Direction::Left;
        velocity.moving = false;
        buffered.0 = None;
        appearance.0 = GameSprite::Pacman(PacmanSprite::Moving(Direction::Left));
    }

    let mut ghosts = world.query_filtered::<(
        &Ghost,
        &mut GhostMode,
        &Spawn,
        &mut Position,
        &mut Velocity,
        &mut RetreatTimer,
        &mut Appearance,
    ), Without<PlayerControlled>>();
    for (ghost, mut mode, spawn, mut position, mut velocity, mut retreat, mut appearance) in ghosts.iter_mut(world) {
        *mode = GhostMode::Chase;
        position.0 = spawn.0;
        velocity.direction = Direction::Up;
        velocity.speed = GhostMode::Chase.speed();
        velocity.moving = false;
        retreat.0.reset();
        appearance.0 = GameSprite::Ghost(GhostSprite::for_mode(*ghost, GhostMode::Chase, Direction::Up));
    }

    world.resource_mut::<ScaredTimer>().0.reset();
    world.resource_mut::<PhaseTimer>().restart();
    world.resource_mut::<GameSession>().kill_count = 0;
    debug!("Round reset");
}

/// Puts every pellet and power-up back on the board.
pub fn reset_board(world: &mut World) {
    let mut items = world.query::<&mut Item>();
    for mut item in items.iter_mut(world) {
        item.eaten = false;
    }
    world.resource_mut::<GameSession>().pellets_collected = 0;
}

/// Restores a fresh, anonymous game: new session, full lives, full board, actors at their
/// spawns, no pause and no queued input.
///
/// Safe to call any number of times. Pending render and audio cues are left for the host;
/// they expire after the next tick.
pub fn reset_session(world: &mut World) {
    let tuning = world.resource::<Tuning>().clone();

    world.insert_resource(GameSession::default());
    world.insert_resource(PlayerLives(tuning.lives));
    world.insert_resource(ScaredTimer(Timer::new(tuning.scared_duration)));
    world.insert_resource(PhaseTimer::new(tuning.scatter_duration, tuning.chase_duration));

    reset_board(world);
    reset_round(world);

    world.insert_resource(GameStage::Playing);
    world.insert_resource(PauseState::Inactive);
    world.resource_mut::<InputQueue>().clear();
    world.resource_mut::<Events<CollisionEvent>>().clear();
    world.resource_mut::<Events<GameError>>().clear();
    debug!("Session reset");
}
