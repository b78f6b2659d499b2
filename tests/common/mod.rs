#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use bevy_ecs::{entity::Entity, world::World};
use glam::{IVec2, Vec2};
use pacman_engine::{
    config::Tuning,
    constants::LOOP_TIME,
    engine::Engine,
    error::PersistenceError,
    game::Game,
    map::board::Board,
    events::RenderCue,
    report::{GameReport, ScorePersister, ScoreRecord},
    systems::{Ghost, GhostMode, Item, ItemKind, Position},
};

/// Tuning for deterministic tests: no random ghost turns and a short death animation.
pub fn test_tuning() -> Tuning {
    Tuning {
        ghost_randomness: 0.0,
        death_animation: Duration::from_millis(100),
        ..Tuning::default()
    }
}

pub fn create_test_game() -> Game {
    create_test_game_with(test_tuning())
}

pub fn create_test_game_with(tuning: Tuning) -> Game {
    Game::new(tuning, Some(42)).expect("standard board should build")
}

/// A persister that remembers what it was asked to save, or fails every save.
#[derive(Clone, Default)]
pub struct RecordingPersister {
    pub saved: Rc<RefCell<Vec<ScoreRecord>>>,
    pub fail_with: Option<String>,
}

impl ScorePersister for RecordingPersister {
    fn save(&mut self, record: &ScoreRecord) -> Result<String, PersistenceError> {
        if let Some(message) = &self.fail_with {
            return Err(PersistenceError::Rejected(message.clone()));
        }
        self.saved.borrow_mut().push(record.clone());
        Ok("Score saved successfully".to_string())
    }
}

pub fn create_test_engine(tuning: Tuning, persister: RecordingPersister) -> Engine {
    Engine::new(create_test_game_with(tuning), Box::new(persister))
}

/// Collects every report delivered to the callback it hands out.
pub fn report_sink() -> (Rc<RefCell<Vec<GameReport>>>, impl FnOnce(GameReport) + 'static) {
    let reports = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&reports);
    (reports, move |report| sink.borrow_mut().push(report))
}

pub fn tick_frames(game: &mut Game, frames: usize) {
    for _ in 0..frames {
        game.tick(LOOP_TIME);
    }
}

/// Ticks like a host does, draining the render cues after every frame.
pub fn tick_frames_collecting_cues(game: &mut Game, frames: usize) -> Vec<RenderCue> {
    let mut cues = Vec::new();
    for _ in 0..frames {
        game.tick(LOOP_TIME);
        cues.extend(game.drain_cues());
    }
    cues
}

pub fn ghost(game: &mut Game, ghost: Ghost) -> Entity {
    game.ghost_entity(ghost).expect("ghost should be spawned")
}

pub fn pacman(game: &mut Game) -> Entity {
    game.pacman_entity().expect("pacman should be spawned")
}

pub fn position_of(world: &World, entity: Entity) -> Vec2 {
    world.get::<Position>(entity).expect("entity has a position").0
}

pub fn teleport(world: &mut World, entity: Entity, position: Vec2) {
    world.get_mut::<Position>(entity).expect("entity has a position").0 = position;
}

pub fn teleport_to_cell(world: &mut World, entity: Entity, cell: IVec2) {
    teleport(world, entity, Board::cell_center(cell));
}

pub fn set_mode(world: &mut World, entity: Entity, mode: GhostMode) {
    *world.get_mut::<GhostMode>(entity).expect("entity is a ghost") = mode;
}

pub fn mode_of(world: &World, entity: Entity) -> GhostMode {
    *world.get::<GhostMode>(entity).expect("entity is a ghost")
}

/// All uneaten items of a kind, in no particular order.
pub fn items_of_kind(world: &mut World, kind: ItemKind) -> Vec<Entity> {
    let mut query = world.query::<(Entity, &Item)>();
    query
        .iter(world)
        .filter(|(_, item)| item.kind == kind && !item.eaten)
        .map(|(entity, _)| entity)
        .collect()
}

/// Eats every pellet except one and returns the survivor.
pub fn leave_one_pellet(world: &mut World) -> Entity {
    let pellets = items_of_kind(world, ItemKind::Pellet);
    let (last, rest) = pellets.split_last().expect("board has pellets");
    for entity in rest {
        world.get_mut::<Item>(*entity).expect("pellet").eaten = true;
    }
    *last
}

/// Parks a chasing ghost on top of Pac-Man so the next frame is lethal.
pub fn ambush(game: &mut Game, which: Ghost) {
    let pacman = pacman(game);
    let ghost = ghost(game, which);
    let target = position_of(&game.world, pacman);
    set_mode(&mut game.world, ghost, GhostMode::Chase);
    teleport(&mut game.world, ghost, target);
}
