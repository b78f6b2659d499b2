use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Context};
use pacman_engine::config::{load_config, Config};
use pacman_engine::engine::Engine;
use pacman_engine::game::Game;
use pacman_engine::logging::setup_logging;
use pacman_engine::platform::{FixedTicks, RealtimeTicks, TickSource};
use pacman_engine::report::{GameReport, JsonLinesPersister, NullPersister, ScorePersister};
use pacman_engine::session::PlayerIdentity;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tracing::{debug, info, trace};

/// Keys the autopilot presses, in host key names.
const AUTOPILOT_KEYS: [&str; 4] = ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"];

/// The autopilot picks a new direction this often, in frames.
const AUTOPILOT_INTERVAL: u64 = 20;

fn main() -> anyhow::Result<()> {
    setup_logging();

    let config = load_config().context("Failed to load configuration")?;
    debug!(?config, "Configuration loaded");

    let report = play(&config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Plays one headless game with a random autopilot and returns its report.
fn play(config: &Config) -> anyhow::Result<GameReport> {
    let game = Game::new(config.tuning.clone(), config.seed)?;
    let persister: Box<dyn ScorePersister> = match &config.scores_path {
        Some(path) => Box::new(JsonLinesPersister::new(path)),
        None => Box::new(NullPersister),
    };
    let mut engine = Engine::new(game, persister);

    let mut ticks: Box<dyn TickSource> = if config.realtime {
        Box::new(RealtimeTicks::new(config.frame_time()))
    } else {
        Box::new(FixedTicks::new(config.frame_time()))
    };
    let mut rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(1)),
        None => SmallRng::from_os_rng(),
    };

    let delivered: Rc<RefCell<Option<GameReport>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&delivered);
    let player = config.player.clone().map(PlayerIdentity::new);
    engine.start_game(player, move |report| {
        *sink.borrow_mut() = Some(report);
    })?;

    info!(realtime = config.realtime, max_frames = config.max_frames, "Starting game loop");
    let mut frame = 0u64;
    while engine.is_running() {
        if frame % AUTOPILOT_INTERVAL == 0 {
            if let Some(key) = AUTOPILOT_KEYS.choose(&mut rng) {
                engine.handle_key(key);
            }
        }

        engine.tick(ticks.next_tick())?;
        for cue in engine.drain_cues() {
            trace!(?cue, "Render cue");
        }
        for sound in engine.drain_audio() {
            trace!(?sound, "Audio event");
        }

        frame += 1;
        if engine.is_running() && frame >= config.max_frames {
            info!(frame, "Frame limit reached, quitting");
            engine.quit()?;
        }
    }

    delivered.take().ok_or_else(|| anyhow!("The game ended without a report"))
}
