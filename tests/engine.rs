use std::time::Duration;

use pacman_engine::{
    config::Tuning,
    constants::LOOP_TIME,
    engine::TickStatus,
    error::EngineError,
    events::{GameCommand, RenderCue},
    map::direction::Direction,
    platform::FixedTicks,
    report::ScoreRecord,
    session::PlayerIdentity,
    systems::{GameStage, Ghost},
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::RecordingPersister;

#[test]
fn test_second_start_is_rejected() {
    let mut engine = common::create_test_engine(common::test_tuning(), RecordingPersister::default());
    let (reports, sink) = common::report_sink();
    engine.start_game(None, sink).expect("first start");

    engine
        .send_command(GameCommand::MovePlayer(Direction::Left))
        .expect("game is running");
    engine.tick(LOOP_TIME).expect("game is running");
    let score_before = engine.game().session().score;

    let (_, second_sink) = common::report_sink();
    let result = engine.start_game(Some(PlayerIdentity::new("blinky")), second_sink);

    assert_eq!(result, Err(EngineError::ConcurrentStartRejected));
    assert_that(&engine.is_running()).is_true();
    assert_that(&engine.game().session().player).is_none();
    assert_that(&engine.game().session().score).is_equal_to(score_before);
    assert_that(&reports.borrow().len()).is_equal_to(0);
}

#[test]
fn test_commands_and_ticks_need_a_running_game() {
    let mut engine = common::create_test_engine(common::test_tuning(), RecordingPersister::default());

    assert_eq!(engine.tick(LOOP_TIME), Err(EngineError::NotRunning));
    assert_eq!(engine.send_command(GameCommand::TogglePause), Err(EngineError::NotRunning));
    assert_eq!(engine.quit(), Err(EngineError::NotRunning));
    assert_that(&engine.handle_key("ArrowLeft")).is_false();
}

#[test]
fn test_victory_is_reported_once() {
    let persister = RecordingPersister::default();
    let saved = persister.saved.clone();
    let mut engine = common::create_test_engine(common::test_tuning(), persister);
    let (reports, sink) = common::report_sink();
    engine
        .start_game(Some(PlayerIdentity::new("clyde")), sink)
        .expect("start");

    let game = engine.game_mut();
    let pacman = common::pacman(game);
    let last = common::leave_one_pellet(&mut game.world);
    let spot = common::position_of(&game.world, last);
    common::teleport(&mut game.world, pacman, spot);
    game.session_mut().score = 2400;

    let status = engine.tick(LOOP_TIME).expect("game is running");
    assert_eq!(status, TickStatus::Finished);
    assert_that(&engine.is_running()).is_false();
    assert_eq!(engine.tick(LOOP_TIME), Err(EngineError::NotRunning));

    let reports = reports.borrow();
    assert_that(&reports.len()).is_equal_to(1);
    let report = &reports[0];
    assert_that(&report.is_victory).is_true();
    assert_that(&report.level).is_equal_to(2);
    assert_that(&report.score).is_equal_to(2410);
    assert_eq!(report.save_result.as_deref(), Some("Success: Score saved successfully"));
    assert_eq!(report.player, Some(PlayerIdentity::new("clyde")));

    assert_eq!(
        *saved.borrow(),
        vec![ScoreRecord {
            username: "clyde".to_string(),
            score: 2410,
        }]
    );
}

#[test]
fn test_defeat_report() {
    let tuning = Tuning {
        lives: 1,
        ..common::test_tuning()
    };
    let mut engine = common::create_test_engine(tuning, RecordingPersister::default());
    let (reports, sink) = common::report_sink();
    engine.start_game(None, sink).expect("start");

    common::ambush(engine.game_mut(), Ghost::Blinky);
    let mut frames = 0;
    while engine.tick(LOOP_TIME).expect("game is running") == TickStatus::Running {
        frames += 1;
        assert_that(&(frames < 60)).is_true();
    }

    let reports = reports.borrow();
    assert_that(&reports.len()).is_equal_to(1);
    assert_that(&reports[0].is_victory).is_false();
    assert_that(&reports[0].level).is_equal_to(1);
    // Anonymous games are never saved
    assert_that(&reports[0].save_result).is_none();
}

#[test]
fn test_failed_save_is_reported_not_raised() {
    let persister = RecordingPersister {
        fail_with: Some("Score service unavailable".to_string()),
        ..RecordingPersister::default()
    };
    let mut engine = common::create_test_engine(common::test_tuning(), persister);
    let (reports, sink) = common::report_sink();
    engine
        .start_game(Some(PlayerIdentity::new("pinky")), sink)
        .expect("start");

    engine.quit().expect("game is running");

    let reports = reports.borrow();
    assert_that(&reports.len()).is_equal_to(1);
    assert_eq!(reports[0].save_result.as_deref(), Some("Error: Score service unavailable"));
}

#[test]
fn test_quit_goes_through_teardown() {
    let mut engine = common::create_test_engine(common::test_tuning(), RecordingPersister::default());
    let (reports, sink) = common::report_sink();
    engine.start_game(None, sink).expect("start");

    engine
        .send_command(GameCommand::MovePlayer(Direction::Right))
        .expect("game is running");
    common::tick_frames(engine.game_mut(), 90);
    engine.drain_cues();

    engine.quit().expect("game is running");

    assert_that(&engine.is_running()).is_false();
    assert_that(&engine.drain_cues()).contains(RenderCue::PleaseWait);

    let reports = reports.borrow();
    assert_that(&reports.len()).is_equal_to(1);
    assert_that(&reports[0].is_victory).is_false();
    assert_that(&reports[0].duration).is_equal_to(1);

    // The session was reset for the next game
    assert_that(&engine.game().session().score).is_equal_to(0);
    assert_eq!(*engine.game().stage(), GameStage::Playing);
}

#[test]
fn test_engine_can_start_again_after_a_game() {
    let mut engine = common::create_test_engine(common::test_tuning(), RecordingPersister::default());
    let (reports, sink) = common::report_sink();
    engine.start_game(None, sink).expect("start");
    engine.quit().expect("game is running");

    let (second_reports, second_sink) = common::report_sink();
    engine
        .start_game(Some(PlayerIdentity::new("inky")), second_sink)
        .expect("second start");
    engine.quit().expect("game is running");

    assert_that(&reports.borrow().len()).is_equal_to(1);
    assert_that(&second_reports.borrow().len()).is_equal_to(1);
}

#[test]
fn test_handle_key_feeds_bound_commands() {
    let mut engine = common::create_test_engine(common::test_tuning(), RecordingPersister::default());
    let (_reports, sink) = common::report_sink();
    engine.start_game(None, sink).expect("start");

    assert_that(&engine.handle_key("Enter")).is_false();
    assert_that(&engine.handle_key("p")).is_true();
    engine.tick(LOOP_TIME).expect("game is running");

    assert_that(&engine.game().is_paused()).is_true();
    assert_that(&engine.drain_cues()).contains(RenderCue::Paused(true));
}

#[test]
fn test_run_drives_game_to_completion() {
    let tuning = Tuning {
        lives: 1,
        ..common::test_tuning()
    };
    let mut engine = common::create_test_engine(tuning, RecordingPersister::default());
    let (reports, sink) = common::report_sink();
    engine.start_game(None, sink).expect("start");
    common::ambush(engine.game_mut(), Ghost::Inky);

    let mut ticks = FixedTicks::new(Duration::from_millis(20));
    engine.run(&mut ticks).expect("game is running");

    assert_that(&engine.is_running()).is_false();
    assert_that(&reports.borrow().len()).is_equal_to(1);
}

#[test]
fn test_cues_from_a_finished_game_do_not_reach_the_next() {
    let tuning = Tuning {
        lives: 1,
        ..common::test_tuning()
    };
    let mut engine = common::create_test_engine(tuning, RecordingPersister::default());

    for _ in 0..5 {
        let (reports, sink) = common::report_sink();
        engine.start_game(None, sink).expect("start");
        assert_that(&engine.drain_cues()).is_empty();
        assert_that(&engine.drain_audio()).is_empty();

        common::ambush(engine.game_mut(), Ghost::Clyde);
        engine.run(&mut FixedTicks::default()).expect("game is running");
        assert_that(&reports.borrow().len()).is_equal_to(1);
    }
}
