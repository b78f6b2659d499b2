//! The host-facing control surface: starting games, feeding input, and reporting results.

use std::time::Duration;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::config::Tuning;
use crate::error::{EngineError, GameResult};
use crate::events::{AudioEvent, GameCommand, RenderCue};
use crate::game::Game;
use crate::platform::TickSource;
use crate::report::{persist_score, GameReport, NullPersister, ScorePersister};
use crate::session::PlayerIdentity;
use crate::systems::Bindings;

/// Receives the report of a finished game.
pub type GameEndCallback = Box<dyn FnOnce(GameReport)>;

/// What the caller should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// The game goes on.
    Running,
    /// The game ended on this frame and its report has been delivered.
    Finished,
}

struct ActiveGame {
    on_game_end: GameEndCallback,
}

/// Runs at most one game at a time on top of a [`Game`].
///
/// Ending a game always goes through one teardown: emit the please-wait cue, persist the
/// score, build the report, deliver it, reset the session.
pub struct Engine {
    game: Game,
    persister: Box<dyn ScorePersister>,
    bindings: Bindings,
    active: Option<ActiveGame>,
}

impl Engine {
    pub fn new(game: Game, persister: Box<dyn ScorePersister>) -> Self {
        Self {
            game,
            persister,
            bindings: Bindings::default(),
            active: None,
        }
    }

    /// An engine on the standard board that cannot persist scores.
    pub fn with_defaults(tuning: Tuning, seed: Option<u64>) -> GameResult<Self> {
        Ok(Self::new(Game::new(tuning, seed)?, Box::new(NullPersister)))
    }

    pub fn with_bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Starts a game for `player`, or an anonymous one.
    ///
    /// Cues left over from the previous game are discarded.
    ///
    /// # Errors
    ///
    /// [`EngineError::ConcurrentStartRejected`] if a game is already running; the running
    /// game is left untouched.
    pub fn start_game(
        &mut self,
        player: Option<PlayerIdentity>,
        on_game_end: impl FnOnce(GameReport) + 'static,
    ) -> Result<(), EngineError> {
        if self.active.is_some() {
            warn!("Rejected a second concurrent game start");
            return Err(EngineError::ConcurrentStartRejected);
        }

        self.game.clear_cues();
        self.game.reset_session();
        {
            let mut session = self.game.session_mut();
            session.player = player;
            session.started_at = OffsetDateTime::now_utc();
        }

        let session = self.game.session();
        info!(
            player = session.player.as_ref().map(|p| p.username.as_str()).unwrap_or("anonymous"),
            started_at = session.started_at.format(&Rfc3339).unwrap_or_default(),
            "Game started"
        );

        self.active = Some(ActiveGame {
            on_game_end: Box::new(on_game_end),
        });
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Queues a command for the next frame.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotRunning`] when no game is active.
    pub fn send_command(&mut self, command: GameCommand) -> Result<(), EngineError> {
        if self.active.is_none() {
            return Err(EngineError::NotRunning);
        }
        self.game.push_command(command);
        Ok(())
    }

    /// Queues the command bound to a host key. Unbound keys, and keys arriving while no
    /// game runs, are dropped. Returns whether the key was accepted.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match self.bindings.command(key) {
            Some(command) => self.send_command(command).is_ok(),
            None => {
                debug!(key, "Ignoring unbound key");
                false
            }
        }
    }

    /// Runs one frame of the active game, finishing it if it ended.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotRunning`] when no game is active.
    pub fn tick(&mut self, dt: Duration) -> Result<TickStatus, EngineError> {
        if self.active.is_none() {
            return Err(EngineError::NotRunning);
        }

        self.game.tick(dt);
        if self.game.is_over() {
            self.finish();
            return Ok(TickStatus::Finished);
        }
        Ok(TickStatus::Running)
    }

    /// Drives the active game from `ticks` until it ends.
    pub fn run(&mut self, ticks: &mut dyn TickSource) -> Result<(), EngineError> {
        loop {
            let dt = ticks.next_tick();
            if self.tick(dt)? == TickStatus::Finished {
                return Ok(());
            }
        }
    }

    /// Ends the active game early, reporting it like any other ending.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotRunning`] when no game is active.
    pub fn quit(&mut self) -> Result<(), EngineError> {
        if self.active.is_none() {
            return Err(EngineError::NotRunning);
        }
        info!("Game quit before it ended");
        self.finish();
        Ok(())
    }

    /// The single teardown path of a game.
    fn finish(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.game.world.send_event(RenderCue::PleaseWait);
        self.game.world.send_event(AudioEvent::StopGhostAudio);

        let session = self.game.session().clone();
        let save_result = persist_score(self.persister.as_mut(), &session);
        let report = GameReport::from_session(&session, save_result);
        info!(
            score = report.score,
            level = report.level,
            duration = report.duration,
            victory = report.is_victory,
            "Game over"
        );

        (active.on_game_end)(report);
        self.game.reset_session();
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Takes every render cue emitted since the last call.
    pub fn drain_cues(&mut self) -> Vec<RenderCue> {
        self.game.drain_cues()
    }

    /// Takes every audio event emitted since the last call.
    pub fn drain_audio(&mut self) -> Vec<AudioEvent> {
        self.game.drain_audio()
    }
}
