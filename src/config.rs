use std::path::PathBuf;
use std::time::Duration;

use bevy_ecs::resource::Resource;
use figment::{providers::Env, Figment};
use serde::{Deserialize, Deserializer};

use crate::constants;
use crate::error::ConfigError;

/// The gameplay knobs the engine reads while running.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Tuning {
    /// Lives at the start of a game.
    pub lives: u8,
    /// Length of the scared window on level 1.
    pub scared_duration: Duration,
    /// How much shorter the scared window gets per cleared board.
    pub scared_step: Duration,
    /// The scared window never gets shorter than this.
    pub scared_floor: Duration,
    pub retreat_duration: Duration,
    /// Length of each scatter phase, when chasing ghosts head for their corners.
    pub scatter_duration: Duration,
    /// Length of each chase phase, when chasing ghosts hunt Pac-Man.
    pub chase_duration: Duration,
    /// Length of the death animation that precedes a respawn or game over.
    pub death_animation: Duration,
    /// Clearing this level's board ends the game.
    pub final_level: u32,
    /// Chance that a chasing ghost takes a random turn at an intersection.
    pub ghost_randomness: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lives: constants::INITIAL_LIVES,
            scared_duration: constants::SCARED_DURATION,
            scared_step: constants::SCARED_DURATION_STEP,
            scared_floor: constants::SCARED_DURATION_FLOOR,
            retreat_duration: constants::RETREAT_DURATION,
            scatter_duration: constants::SCATTER_DURATION,
            chase_duration: constants::CHASE_DURATION,
            death_animation: constants::DEATH_ANIMATION_DURATION,
            final_level: 1,
            ghost_randomness: constants::GHOST_RANDOMNESS,
        }
    }
}

impl Tuning {
    /// The scared window length in effect on `level`.
    pub fn scared_duration_for_level(&self, level: u32) -> Duration {
        let shrink = self.scared_step.saturating_mul(level.saturating_sub(1));
        self.scared_duration.saturating_sub(shrink).max(self.scared_floor.min(self.scared_duration))
    }
}

/// Slowest accepted tick rate, in frames per second.
const MIN_FRAME_RATE: f32 = 1.0;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct Config {
    pub tuning: Tuning,
    /// Frames per second of the real-time tick source.
    pub frame_rate: f32,
    /// Seed for ghost steering; random when unset.
    pub seed: Option<u64>,
    /// Player name; anonymous when unset.
    pub player: Option<String>,
    /// File scores are appended to; persistence is disabled when unset.
    pub scores_path: Option<PathBuf>,
    /// Pace frames in real time instead of running them back to back.
    pub realtime: bool,
    /// Safety cap on the number of frames a headless game may run.
    pub max_frames: u64,
}

/// Raw configuration loaded directly from environment variables
/// This is an intermediate representation that gets validated and converted to Config
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_lives")]
    lives: u8,
    #[serde(default = "default_scared_ms")]
    scared_ms: u64,
    #[serde(default = "default_scared_step_ms")]
    scared_step_ms: u64,
    #[serde(default = "default_scared_floor_ms")]
    scared_floor_ms: u64,
    #[serde(default = "default_retreat_ms")]
    retreat_ms: u64,
    #[serde(default = "default_scatter_ms")]
    scatter_ms: u64,
    #[serde(default = "default_chase_ms")]
    chase_ms: u64,
    #[serde(default = "default_death_animation_ms")]
    death_animation_ms: u64,
    #[serde(default = "default_final_level")]
    final_level: u32,
    #[serde(default = "default_ghost_randomness")]
    ghost_randomness: f64,

    #[serde(default = "default_frame_rate")]
    frame_rate: f32,
    seed: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_optional_string_from_any")]
    player: Option<String>,
    scores_path: Option<PathBuf>,
    #[serde(default)]
    realtime: bool,
    #[serde(default = "default_max_frames")]
    max_frames: u64,
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        if raw.lives == 0 {
            return Err(ConfigError::Invalid("lives must be at least 1".into()));
        }
        if raw.final_level == 0 {
            return Err(ConfigError::Invalid("final_level must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&raw.ghost_randomness) {
            return Err(ConfigError::Invalid(format!(
                "ghost_randomness must be within 0..=1, got {}",
                raw.ghost_randomness
            )));
        }
        if !raw.frame_rate.is_finite() || raw.frame_rate < MIN_FRAME_RATE {
            return Err(ConfigError::Invalid(format!(
                "frame_rate must be at least {MIN_FRAME_RATE}, got {}",
                raw.frame_rate
            )));
        }
        if raw.scatter_ms == 0 || raw.chase_ms == 0 {
            return Err(ConfigError::Invalid("scatter_ms and chase_ms must be positive".into()));
        }

        Ok(Config {
            tuning: Tuning {
                lives: raw.lives,
                scared_duration: Duration::from_millis(raw.scared_ms),
                scared_step: Duration::from_millis(raw.scared_step_ms),
                scared_floor: Duration::from_millis(raw.scared_floor_ms),
                retreat_duration: Duration::from_millis(raw.retreat_ms),
                scatter_duration: Duration::from_millis(raw.scatter_ms),
                chase_duration: Duration::from_millis(raw.chase_ms),
                death_animation: Duration::from_millis(raw.death_animation_ms),
                final_level: raw.final_level,
                ghost_randomness: raw.ghost_randomness,
            },
            frame_rate: raw.frame_rate,
            seed: raw.seed,
            player: raw.player.filter(|name| !name.trim().is_empty()),
            scores_path: raw.scores_path,
            realtime: raw.realtime,
            max_frames: raw.max_frames,
        })
    }
}

impl Config {
    /// The frame duration of the real-time tick source.
    pub fn frame_time(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.frame_rate)
    }
}

fn default_lives() -> u8 {
    constants::INITIAL_LIVES
}

fn default_scared_ms() -> u64 {
    constants::SCARED_DURATION.as_millis() as u64
}

fn default_scared_step_ms() -> u64 {
    constants::SCARED_DURATION_STEP.as_millis() as u64
}

fn default_scared_floor_ms() -> u64 {
    constants::SCARED_DURATION_FLOOR.as_millis() as u64
}

fn default_retreat_ms() -> u64 {
    constants::RETREAT_DURATION.as_millis() as u64
}

fn default_scatter_ms() -> u64 {
    constants::SCATTER_DURATION.as_millis() as u64
}

fn default_chase_ms() -> u64 {
    constants::CHASE_DURATION.as_millis() as u64
}

fn default_death_animation_ms() -> u64 {
    constants::DEATH_ANIMATION_DURATION.as_millis() as u64
}

fn default_final_level() -> u32 {
    1
}

fn default_ghost_randomness() -> f64 {
    constants::GHOST_RANDOMNESS
}

fn default_frame_rate() -> f32 {
    constants::BASE_FRAME_RATE
}

fn default_max_frames() -> u64 {
    // Ten minutes of play at the base frame rate.
    36_000
}

fn deserialize_optional_string_from_any<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Null) | None => Ok(None),
        _ => Err(serde::de::Error::custom("Expected string, number, or null")),
    }
}

/// Loads the configuration from `PACMAN_`-prefixed environment variables.
pub fn load_config() -> Result<Config, ConfigError> {
    Ok(Figment::new().merge(Env::prefixed("PACMAN_")).extract()?)
}
