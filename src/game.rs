//! This module contains the main game logic and state.

use std::time::Duration;

use bevy_ecs::entity::Entity;
use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::query::With;
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::system::Res;
use bevy_ecs::world::World;
use tracing::{debug, warn};

use crate::config::Tuning;
use crate::constants::{self, collider, RAW_BOARD};
use crate::error::{GameError, GameResult};
use crate::events::{AudioEvent, CollisionEvent, GameCommand, RenderCue};
use crate::map::board::Board;
use crate::map::direction::Direction;
use crate::map::MapTile;
use crate::session::GameSession;
use crate::sprites::{GameSprite, GhostSprite, MazeSprite, PacmanSprite};
use crate::systems::{
    collision_dispatch_system, collision_system, command_system, ghost_mode_timer_system, ghost_movement_system,
    ghost_phase_system, player_movement_system, reset_session, stage_system, Appearance, BufferedDirection, Collider,
    DeltaTime, GameRng, GameStage, Ghost, GhostBundle, GhostCollider, GhostMode, GhostPhase, InputQueue, Item,
    ItemBundle, ItemCollider, ItemKind, Pacman, PacmanCollider, PauseState, PhaseTimer, PlayerBundle, PlayerControlled,
    PlayerLives, Position, RetreatTimer, ScaredTimer, Spawn, Velocity,
};
use crate::timer::Timer;

/// System sets fixing the order of one frame.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum GameplaySet {
    /// Applies queued commands. Always runs, so a paused game can be resumed.
    Input,
    /// Moves actors, advances the ghost cycle and mode timers, and detects collisions.
    Update,
    /// Consumes collision events.
    Respond,
    /// Death sequence, level changes and game over.
    Stage,
}

/// Core game state manager built on the Bevy ECS architecture.
///
/// Orchestrates all game systems through a centralized `World` containing entities,
/// components, and resources, while a `Schedule` defines system execution order.
/// The game knows nothing about hosts, players or persistence; see [`crate::engine`].
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

impl Game {
    /// Builds a game on the standard board.
    pub fn new(tuning: Tuning, seed: Option<u64>) -> GameResult<Game> {
        Self::with_board(&RAW_BOARD, tuning, seed)
    }

    /// Builds a game on a custom board layout.
    pub fn with_board(raw_board: &[&str], tuning: Tuning, seed: Option<u64>) -> GameResult<Game> {
        let board = Board::new(raw_board)?;

        let mut world = World::default();
        let mut schedule = Schedule::default();

        Self::setup_ecs(&mut world);
        Self::insert_resources(&mut world, board, tuning, seed);
        Self::spawn_entities(&mut world)?;
        Self::configure_schedule(&mut schedule);

        Ok(Game { world, schedule })
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<GameError>(world);
        EventRegistry::register_event::<CollisionEvent>(world);
        EventRegistry::register_event::<RenderCue>(world);
        EventRegistry::register_event::<AudioEvent>(world);
    }

    fn insert_resources(world: &mut World, board: Board, tuning: Tuning, seed: Option<u64>) {
        world.insert_resource(PlayerLives(tuning.lives));
        world.insert_resource(ScaredTimer(Timer::new(tuning.scared_duration)));
        world.insert_resource(PhaseTimer::new(tuning.scatter_duration, tuning.chase_duration));
        world.insert_resource(board);
        world.insert_resource(tuning);
        world.insert_resource(GameSession::default());
        world.insert_resource(GameStage::default());
        world.insert_resource(PauseState::default());
        world.insert_resource(InputQueue::default());
        world.insert_resource(GameRng::new(seed));
        world.insert_resource(DeltaTime::from_duration(Duration::ZERO));
    }

    fn spawn_entities(world: &mut World) -> GameResult<()> {
        let board = world.resource::<Board>().clone();
        let retreat_duration = world.resource::<Tuning>().retreat_duration;

        let pacman_spawn = Board::cell_center(board.pacman_start);
        world.spawn(PlayerBundle {
            player: PlayerControlled,
            pacman: Pacman::default(),
            position: Position(pacman_spawn),
            velocity: Velocity {
                direction: Direction::Left,
                speed: constants::speed::PACMAN,
                moving: false,
            },
            buffered_direction: BufferedDirection::default(),
            collider: Collider {
                radius: collider::PACMAN_RADIUS,
            },
            spawn: Spawn(pacman_spawn),
            appearance: Appearance(GameSprite::Pacman(PacmanSprite::Moving(Direction::Left))),
            pacman_collider: PacmanCollider,
        });

        for (ghost, cell) in Ghost::ALL.into_iter().zip(board.ghost_starts.iter().copied()) {
            let spawn = Board::cell_center(cell);
            world.spawn(GhostBundle {
                ghost,
                mode: GhostMode::Chase,
                position: Position(spawn),
                velocity: Velocity {
                    direction: Direction::Up,
                    speed: GhostMode::Chase.speed(),
                    moving: false,
                },
                collider: Collider {
                    radius: collider::GHOST_RADIUS,
                },
                spawn: Spawn(spawn),
                retreat_timer: RetreatTimer(Timer::new(retreat_duration)),
                appearance: Appearance(GameSprite::Ghost(GhostSprite::for_mode(ghost, GhostMode::Chase, Direction::Up))),
                ghost_collider: GhostCollider,
            });
        }

        let mut pellets = 0usize;
        for (cell, tile) in board.items() {
            let (kind, radius, sprite) = match tile {
                MapTile::Pellet => (ItemKind::Pellet, collider::PELLET_RADIUS, MazeSprite::Pellet),
                MapTile::PowerUp => (ItemKind::PowerUp, collider::POWER_UP_RADIUS, MazeSprite::PowerUp),
                other => {
                    return Err(GameError::InvalidState(format!("Board listed {other:?} as an item")));
                }
            };
            pellets += usize::from(kind == ItemKind::Pellet);
            world.spawn(ItemBundle {
                item: Item { kind, eaten: false },
                position: Position(Board::cell_center(cell)),
                collider: Collider { radius },
                appearance: Appearance(GameSprite::Maze(sprite)),
                item_collider: ItemCollider,
            });
        }

        debug!(ghosts = board.ghost_starts.len(), pellets, "Entities spawned");
        Ok(())
    }

    fn configure_schedule(schedule: &mut Schedule) {
        schedule
            .add_systems((
                command_system.in_set(GameplaySet::Input),
                (
                    player_movement_system,
                    ghost_phase_system,
                    ghost_movement_system,
                    ghost_mode_timer_system,
                    collision_system,
                )
                    .chain()
                    .in_set(GameplaySet::Update),
                collision_dispatch_system.in_set(GameplaySet::Respond),
                stage_system.in_set(GameplaySet::Stage),
            ))
            .configure_sets(
                (
                    GameplaySet::Input,
                    GameplaySet::Update.run_if(|paused: Res<PauseState>, stage: Res<GameStage>| {
                        !paused.active() && stage.is_playing()
                    }),
                    GameplaySet::Respond.run_if(|paused: Res<PauseState>| !paused.active()),
                    GameplaySet::Stage.run_if(|paused: Res<PauseState>| !paused.active()),
                )
                    .chain(),
            );
    }

    /// Executes one frame of game logic.
    ///
    /// The session clock advances on every frame, paused or not. Failures reported by
    /// systems are logged and dropped; none of them end the game. Render and audio cues
    /// stay readable until the end of the following tick, so hosts drain them every frame.
    pub fn tick(&mut self, dt: Duration) {
        self.world.insert_resource(DeltaTime::from_duration(dt));
        self.world.resource_mut::<GameSession>().elapsed += dt;

        self.schedule.run(&mut self.world);

        for error in self.world.resource_mut::<Events<GameError>>().drain() {
            warn!(error = %error, "Engine error contained");
        }
        self.world.resource_mut::<Events<CollisionEvent>>().update();
        self.world.resource_mut::<Events<RenderCue>>().update();
        self.world.resource_mut::<Events<AudioEvent>>().update();
    }

    /// Drops every render and audio cue that has not been drained.
    pub fn clear_cues(&mut self) {
        self.world.resource_mut::<Events<RenderCue>>().clear();
        self.world.resource_mut::<Events<AudioEvent>>().clear();
    }

    /// Queues a command for the next frame.
    pub fn push_command(&mut self, command: GameCommand) {
        self.world.resource_mut::<InputQueue>().push(command);
    }

    /// Restores a fresh game. Idempotent.
    pub fn reset_session(&mut self) {
        reset_session(&mut self.world);
    }

    pub fn session(&self) -> &GameSession {
        self.world.resource::<GameSession>()
    }

    pub fn session_mut(&mut self) -> bevy_ecs::change_detection::Mut<'_, GameSession> {
        self.world.resource_mut::<GameSession>()
    }

    pub fn lives(&self) -> u8 {
        self.world.resource::<PlayerLives>().0
    }

    pub fn stage(&self) -> &GameStage {
        self.world.resource::<GameStage>()
    }

    /// The current half of the global ghost cycle.
    pub fn ghost_phase(&self) -> GhostPhase {
        self.world.resource::<PhaseTimer>().phase
    }

    pub fn is_paused(&self) -> bool {
        self.world.resource::<PauseState>().active()
    }

    pub fn is_over(&self) -> bool {
        matches!(self.stage(), GameStage::GameOver)
    }

    pub fn board(&self) -> &Board {
        self.world.resource::<Board>()
    }

    /// Finds the entity of a ghost.
    pub fn ghost_entity(&mut self, ghost: Ghost) -> Option<Entity> {
        let mut query = self.world.query::<(Entity, &Ghost)>();
        query
            .iter(&self.world)
            .find_map(|(entity, kind)| (*kind == ghost).then_some(entity))
    }

    /// Current mode of a ghost, if it exists on this board.
    pub fn ghost_mode(&mut self, ghost: Ghost) -> Option<GhostMode> {
        let entity = self.ghost_entity(ghost)?;
        self.world.get::<GhostMode>(entity).copied()
    }

    /// The player entity.
    pub fn pacman_entity(&mut self) -> Option<Entity> {
        let mut query = self.world.query_filtered::<Entity, With<PlayerControlled>>();
        query.iter(&self.world).next()
    }

    /// Takes every render cue emitted since the last call.
    pub fn drain_cues(&mut self) -> Vec<RenderCue> {
        self.world.resource_mut::<Events<RenderCue>>().drain().collect()
    }

    /// Takes every audio event emitted since the last call.
    pub fn drain_audio(&mut self) -> Vec<AudioEvent> {
        self.world.resource_mut::<Events<AudioEvent>>().drain().collect()
    }
}
