use bevy_ecs::{event::Events, system::RunSystemOnce, world::World};
use pacman_engine::{
    events::{AudioEvent, CollisionEvent, RenderCue},
    game::Game,
    systems::{
        collision_dispatch_system, GameStage, Ghost, GhostMode, Item, ItemKind, Pacman, RetreatTimer, ScaredTimer,
    },
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

/// Runs the dispatcher over exactly `events`.
fn dispatch(world: &mut World, events: &[CollisionEvent]) {
    world.resource_mut::<Events<CollisionEvent>>().clear();
    for event in events {
        world.send_event(*event);
    }
    world
        .run_system_once(collision_dispatch_system)
        .expect("System should run successfully");
}

fn first_item(game: &mut Game, kind: ItemKind) -> bevy_ecs::entity::Entity {
    common::items_of_kind(&mut game.world, kind)[0]
}

#[test]
fn test_pellet_scores_and_counts() {
    let mut game = common::create_test_game();
    let pellet = first_item(&mut game, ItemKind::Pellet);

    dispatch(&mut game.world, &[CollisionEvent::PelletEaten(pellet)]);

    assert_that(&game.session().score).is_equal_to(10);
    assert_that(&game.session().pellets_collected).is_equal_to(1);
    assert_that(&game.world.get::<Item>(pellet).expect("item").eaten).is_true();
}

#[test]
fn test_eaten_pellet_is_not_scored_twice() {
    let mut game = common::create_test_game();
    let pellet = first_item(&mut game, ItemKind::Pellet);

    dispatch(&mut game.world, &[CollisionEvent::PelletEaten(pellet)]);
    dispatch(&mut game.world, &[CollisionEvent::PelletEaten(pellet)]);

    assert_that(&game.session().score).is_equal_to(10);
    assert_that(&game.session().pellets_collected).is_equal_to(1);
}

#[test]
fn test_power_up_scares_chasing_ghosts() {
    let mut game = common::create_test_game();
    let power_up = first_item(&mut game, ItemKind::PowerUp);
    let clyde = common::ghost(&mut game, Ghost::Clyde);
    common::set_mode(&mut game.world, clyde, GhostMode::Retreating);

    dispatch(&mut game.world, &[CollisionEvent::PowerUpEaten(power_up)]);

    assert_that(&game.session().score).is_equal_to(50);
    assert_that(&game.session().pellets_collected).is_equal_to(0);
    assert_that(&game.world.resource::<ScaredTimer>().0.is_running()).is_true();
    for ghost in [Ghost::Blinky, Ghost::Pinky, Ghost::Inky] {
        let entity = common::ghost(&mut game, ghost);
        assert_eq!(common::mode_of(&game.world, entity), GhostMode::Scared);
    }
    assert_eq!(common::mode_of(&game.world, clyde), GhostMode::Retreating);

    let audio: Vec<AudioEvent> = game.world.resource_mut::<Events<AudioEvent>>().drain().collect();
    assert_that(&audio).contains(AudioEvent::PlayPowerUp);
}

#[test]
fn test_power_up_keeps_kill_count() {
    let mut game = common::create_test_game();
    let power_up = first_item(&mut game, ItemKind::PowerUp);
    game.session_mut().kill_count = 1;

    dispatch(&mut game.world, &[CollisionEvent::PowerUpEaten(power_up)]);

    assert_that(&game.session().kill_count).is_equal_to(1);
}

#[test]
fn test_two_captures_in_one_window() {
    let mut game = common::create_test_game();
    let power_up = first_item(&mut game, ItemKind::PowerUp);
    let blinky = common::ghost(&mut game, Ghost::Blinky);
    let pinky = common::ghost(&mut game, Ghost::Pinky);

    dispatch(&mut game.world, &[CollisionEvent::PowerUpEaten(power_up)]);
    let before = game.session().score;
    dispatch(
        &mut game.world,
        &[CollisionEvent::GhostCaptured(blinky), CollisionEvent::GhostCaptured(pinky)],
    );

    assert_that(&(game.session().score - before)).is_equal_to(600);
    assert_that(&game.session().kill_count).is_equal_to(2);
    assert_eq!(common::mode_of(&game.world, blinky), GhostMode::Retreating);
    assert_eq!(common::mode_of(&game.world, pinky), GhostMode::Retreating);
    assert_that(&game.world.get::<RetreatTimer>(blinky).expect("timer").0.is_running()).is_true();

    let cues: Vec<RenderCue> = game.world.resource_mut::<Events<RenderCue>>().drain().collect();
    assert_that(&cues).contains(RenderCue::GhostCaptured {
        ghost: Ghost::Blinky,
        points: 200,
    });
    assert_that(&cues).contains(RenderCue::GhostCaptured {
        ghost: Ghost::Pinky,
        points: 400,
    });
}

#[test]
fn test_nth_capture_awards_doubling_points() {
    let mut game = common::create_test_game();
    let power_up = first_item(&mut game, ItemKind::PowerUp);
    dispatch(&mut game.world, &[CollisionEvent::PowerUpEaten(power_up)]);

    let mut awarded = Vec::new();
    for ghost in Ghost::ALL {
        let entity = common::ghost(&mut game, ghost);
        let before = game.session().score;
        dispatch(&mut game.world, &[CollisionEvent::GhostCaptured(entity)]);
        awarded.push(game.session().score - before);
    }

    assert_eq!(awarded, vec![200, 400, 800, 1600]);
}

#[test]
fn test_retreating_ghost_contact_is_ignored() {
    let mut game = common::create_test_game();
    let inky = common::ghost(&mut game, Ghost::Inky);
    common::set_mode(&mut game.world, inky, GhostMode::Retreating);

    dispatch(&mut game.world, &[CollisionEvent::GhostCaptured(inky)]);

    assert_that(&game.session().score).is_equal_to(0);
    assert_eq!(*game.stage(), GameStage::Playing);
}

#[test]
fn test_chase_contact_starts_death_sequence() {
    let mut game = common::create_test_game();
    let blinky = common::ghost(&mut game, Ghost::Blinky);
    let pinky = common::ghost(&mut game, Ghost::Pinky);
    let pacman = common::pacman(&mut game);

    dispatch(
        &mut game.world,
        &[CollisionEvent::PacmanHit(blinky), CollisionEvent::PacmanHit(pinky)],
    );

    assert_that(&matches!(game.stage(), GameStage::PlayerDying { .. })).is_true();
    assert_that(&game.world.get::<Pacman>(pacman).expect("pacman").shrinking).is_true();
    // Lives are only taken once the death animation ends
    assert_that(&game.lives()).is_equal_to(3);

    let cues: Vec<RenderCue> = game.world.resource_mut::<Events<RenderCue>>().drain().collect();
    assert_eq!(cues, vec![RenderCue::DeathAnimation]);
    let audio: Vec<AudioEvent> = game.world.resource_mut::<Events<AudioEvent>>().drain().collect();
    assert_eq!(audio, vec![AudioEvent::PlayDeath, AudioEvent::StopGhostAudio]);
}

#[test]
fn test_events_after_lethal_hit_are_dropped() {
    let mut game = common::create_test_game();
    let blinky = common::ghost(&mut game, Ghost::Blinky);
    let pinky = common::ghost(&mut game, Ghost::Pinky);
    common::set_mode(&mut game.world, pinky, GhostMode::Scared);

    dispatch(
        &mut game.world,
        &[CollisionEvent::PacmanHit(blinky), CollisionEvent::GhostCaptured(pinky)],
    );

    assert_that(&game.session().score).is_equal_to(0);
    assert_eq!(common::mode_of(&game.world, pinky), GhostMode::Scared);
}

#[test]
fn test_power_up_in_same_frame_turns_hit_into_capture() {
    let mut game = common::create_test_game();
    let power_up = first_item(&mut game, ItemKind::PowerUp);
    let blinky = common::ghost(&mut game, Ghost::Blinky);

    dispatch(
        &mut game.world,
        &[CollisionEvent::PowerUpEaten(power_up), CollisionEvent::PacmanHit(blinky)],
    );

    assert_eq!(*game.stage(), GameStage::Playing);
    assert_eq!(common::mode_of(&game.world, blinky), GhostMode::Retreating);
    assert_that(&game.session().score).is_equal_to(250);
}

#[test]
fn test_board_cleared_halts_ghost_events() {
    let mut game = common::create_test_game();
    let pellet = first_item(&mut game, ItemKind::Pellet);
    let blinky = common::ghost(&mut game, Ghost::Blinky);

    dispatch(
        &mut game.world,
        &[
            CollisionEvent::PelletEaten(pellet),
            CollisionEvent::BoardCleared,
            CollisionEvent::PacmanHit(blinky),
        ],
    );

    assert_eq!(*game.stage(), GameStage::LevelCleared);
    assert_that(&game.session().score).is_equal_to(10);
}

#[test]
fn test_events_outside_play_are_discarded() {
    let mut game = common::create_test_game();
    let pellet = first_item(&mut game, ItemKind::Pellet);
    game.world.insert_resource(GameStage::GameOver);

    dispatch(&mut game.world, &[CollisionEvent::PelletEaten(pellet)]);

    assert_that(&game.session().score).is_equal_to(0);
}
