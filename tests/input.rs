use bevy_ecs::{event::Events, system::RunSystemOnce};
use pacman_engine::{
    events::{GameCommand, RenderCue},
    map::direction::Direction,
    systems::{command_system, BufferedDirection, Bindings, GameStage, InputQueue, PauseState},
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

fn run_commands(game: &mut pacman_engine::game::Game, commands: &[GameCommand]) {
    for command in commands {
        game.push_command(*command);
    }
    game.world
        .run_system_once(command_system)
        .expect("System should run successfully");
}

fn buffered(game: &mut pacman_engine::game::Game) -> Option<Direction> {
    let pacman = common::pacman(game);
    game.world.get::<BufferedDirection>(pacman).expect("buffered direction").0
}

#[test]
fn test_default_bindings() {
    let bindings = Bindings::default();
    assert_eq!(bindings.command("ArrowUp"), Some(GameCommand::MovePlayer(Direction::Up)));
    assert_eq!(bindings.command("a"), Some(GameCommand::MovePlayer(Direction::Left)));
    assert_eq!(bindings.command("D"), Some(GameCommand::MovePlayer(Direction::Right)));
    assert_eq!(bindings.command("Escape"), Some(GameCommand::TogglePause));
    assert_that(&bindings.command("Enter")).is_none();
    assert_that(&bindings.command("arrowup")).is_none();
}

#[test]
fn test_rebinding_a_key() {
    let mut bindings = Bindings::default();
    bindings.bind("k", GameCommand::MovePlayer(Direction::Up));
    bindings.bind("p", GameCommand::MovePlayer(Direction::Down));
    assert_eq!(bindings.command("k"), Some(GameCommand::MovePlayer(Direction::Up)));
    assert_eq!(bindings.command("p"), Some(GameCommand::MovePlayer(Direction::Down)));
}

#[test]
fn test_last_direction_wins() {
    let mut game = common::create_test_game();
    run_commands(
        &mut game,
        &[
            GameCommand::MovePlayer(Direction::Up),
            GameCommand::MovePlayer(Direction::Left),
            GameCommand::MovePlayer(Direction::Down),
        ],
    );

    assert_eq!(buffered(&mut game), Some(Direction::Down));
    assert_that(&game.world.resource::<InputQueue>().is_empty()).is_true();
}

#[test]
fn test_directions_ignored_while_paused() {
    let mut game = common::create_test_game();
    run_commands(
        &mut game,
        &[
            GameCommand::MovePlayer(Direction::Up),
            GameCommand::TogglePause,
            GameCommand::MovePlayer(Direction::Left),
        ],
    );

    assert_eq!(buffered(&mut game), Some(Direction::Up));
    assert_eq!(*game.world.resource::<PauseState>(), PauseState::Active);
}

#[test]
fn test_directions_ignored_outside_play() {
    let mut game = common::create_test_game();
    game.world.insert_resource(GameStage::GameOver);
    run_commands(&mut game, &[GameCommand::MovePlayer(Direction::Right)]);

    assert_that(&buffered(&mut game)).is_none();
}

#[test]
fn test_pause_toggles_emit_cues_in_order() {
    let mut game = common::create_test_game();
    run_commands(&mut game, &[GameCommand::TogglePause, GameCommand::TogglePause]);

    assert_eq!(*game.world.resource::<PauseState>(), PauseState::Inactive);
    let cues: Vec<RenderCue> = game.world.resource_mut::<Events<RenderCue>>().drain().collect();
    assert_eq!(cues, vec![RenderCue::Paused(true), RenderCue::Paused(false)]);
}
