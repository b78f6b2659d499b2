use std::time::Duration;

use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use strum_macros::{AsRefStr, Display};

use crate::constants::{score, speed};
use crate::map::direction::Direction;
use crate::sprites::GameSprite;
use crate::timer::Timer;

/// A tag component for the entity controlled by the player.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// Pac-Man's own state.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Pacman {
    /// Set while the death animation plays.
    pub shrinking: bool,
}

/// The four ghosts, in the order they are spawned.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Ghost {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl Ghost {
    pub const ALL: [Ghost; 4] = [Ghost::Blinky, Ghost::Pinky, Ghost::Inky, Ghost::Clyde];
}

/// What can happen to a ghost that may change its mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTrigger {
    /// Pac-Man ate a power-up.
    PowerUpEaten,
    /// Pac-Man touched the ghost.
    Collided,
    /// The shared scared window ran out.
    ScaredExpired,
    /// The ghost's own retreat timer ran out.
    RetreatExpired,
    /// The ghost arrived at the home cell.
    ReachedHome,
}

/// A ghost's behavioural mode. A ghost is always in exactly one of these.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum GhostMode {
    /// Hunting Pac-Man; lethal on contact. Also the "normal" mode ghosts spawn in.
    #[default]
    Chase,
    /// Fleeing after a power-up; captured on contact.
    Scared,
    /// Heading home after being captured; neither harms nor can be harmed.
    Retreating,
}

impl GhostMode {
    /// The mode a ghost moves to when `trigger` happens while it is in `self`.
    ///
    /// Triggers that do not apply to the current mode leave it unchanged. In particular a
    /// collision with a chasing ghost does not change its mode; it kills Pac-Man instead.
    pub fn next(self, trigger: ModeTrigger) -> GhostMode {
        match (self, trigger) {
            (GhostMode::Chase | GhostMode::Scared, ModeTrigger::PowerUpEaten) => GhostMode::Scared,
            (GhostMode::Scared, ModeTrigger::Collided) => GhostMode::Retreating,
            (GhostMode::Scared, ModeTrigger::ScaredExpired) => GhostMode::Chase,
            (GhostMode::Retreating, ModeTrigger::RetreatExpired | ModeTrigger::ReachedHome) => GhostMode::Chase,
            (mode, _) => mode,
        }
    }

    /// Movement speed in pixels per base frame.
    pub fn speed(self) -> f32 {
        match self {
            GhostMode::Chase => speed::GHOST_CHASE,
            GhostMode::Scared => speed::GHOST_SCARED,
            GhostMode::Retreating => speed::GHOST_RETREATING,
        }
    }
}

/// A pixel-space position; the centre of the entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec2);

/// Heading and speed of a moving entity.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    pub direction: Direction,
    /// Pixels per base frame.
    pub speed: f32,
    /// False while the entity is parked against a wall or waiting for its first input.
    pub moving: bool,
}

/// The last direction the player asked for that has not been applied yet.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BufferedDirection(pub Option<Direction>);

/// Collision radius, used on both axes.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub radius: f32,
}

/// Where an entity returns to when a round restarts.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Spawn(pub Vec2);

/// Each ghost's own countdown for how long it retreats after capture.
#[derive(Component, Debug, Clone)]
pub struct RetreatTimer(pub Timer);

/// The sprite the renderer should currently show for an entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance(pub GameSprite);

/// The kinds of collectible on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Pellet,
    PowerUp,
}

impl ItemKind {
    pub fn score_value(self) -> u32 {
        match self {
            ItemKind::Pellet => score::PELLET,
            ItemKind::PowerUp => score::POWER_UP,
        }
    }
}

/// A collectible. Eaten items stay in the world so the board can be restored.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub kind: ItemKind,
    pub eaten: bool,
}

/// Marker components for collision filtering
#[derive(Component, Default)]
pub struct PacmanCollider;

#[derive(Component, Default)]
pub struct GhostCollider;

#[derive(Component, Default)]
pub struct ItemCollider;

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub pacman: Pacman,
    pub position: Position,
    pub velocity: Velocity,
    pub buffered_direction: BufferedDirection,
    pub collider: Collider,
    pub spawn: Spawn,
    pub appearance: Appearance,
    pub pacman_collider: PacmanCollider,
}

#[derive(Bundle)]
pub struct GhostBundle {
    pub ghost: Ghost,
    pub mode: GhostMode,
    pub position: Position,
    pub velocity: Velocity,
    pub collider: Collider,
    pub spawn: Spawn,
    pub retreat_timer: RetreatTimer,
    pub appearance: Appearance,
    pub ghost_collider: GhostCollider,
}

#[derive(Bundle)]
pub struct ItemBundle {
    pub item: Item,
    pub position: Position,
    pub collider: Collider,
    pub appearance: Appearance,
    pub item_collider: ItemCollider,
}

/// The frame delta the schedule is currently running with.
#[derive(Resource, Debug, Clone, Copy)]
pub struct DeltaTime {
    /// Floating-point delta time in seconds
    pub seconds: f32,
    /// The same delta, for timers
    pub duration: Duration,
}

impl DeltaTime {
    pub fn from_duration(duration: Duration) -> Self {
        Self {
            seconds: duration.as_secs_f32(),
            duration,
        }
    }
}

/// A resource to store the number of player lives.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerLives(pub u8);

/// The single scared window shared by every ghost frightened by the same power-up.
#[derive(Resource, Debug, Clone)]
pub struct ScaredTimer(pub Timer);

/// Which half of the global ghost cycle is running.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum GhostPhase {
    /// Chasing ghosts head for their own corner of the board.
    #[default]
    Scatter,
    /// Chasing ghosts hunt Pac-Man's cell.
    Chase,
}

/// The global scatter/chase cycle shared by every ghost.
///
/// Only steering depends on the phase. A ghost in [`GhostMode::Chase`] is lethal in both
/// phases; scared and retreating ghosts ignore the cycle.
#[derive(Resource, Debug, Clone)]
pub struct PhaseTimer {
    pub phase: GhostPhase,
    pub timer: Timer,
    scatter: Duration,
    chase: Duration,
}

impl PhaseTimer {
    /// A running cycle, starting with a scatter phase.
    pub fn new(scatter: Duration, chase: Duration) -> Self {
        let mut cycle = Self {
            phase: GhostPhase::Scatter,
            timer: Timer::new(scatter),
            scatter,
            chase,
        };
        cycle.restart();
        cycle
    }

    /// Rewinds to the start of a scatter phase and stops the cycle.
    pub fn reset(&mut self) {
        self.phase = GhostPhase::Scatter;
        self.timer.set_duration(self.scatter);
        self.timer.reset();
    }

    /// Rewinds to the start of a scatter phase and runs the cycle.
    pub fn restart(&mut self) {
        self.reset();
        self.timer.start();
    }

    /// Advances the cycle. Returns `true` on the tick the phase flips.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if !self.timer.tick(dt) {
            return false;
        }

        let (phase, duration) = match self.phase {
            GhostPhase::Scatter => (GhostPhase::Chase, self.chase),
            GhostPhase::Chase => (GhostPhase::Scatter, self.scatter),
        };
        self.phase = phase;
        self.timer.set_duration(duration);
        self.timer.start();
        true
    }
}

/// The random source for ghost steering. Seedable so games can be replayed.
#[derive(Resource, Debug)]
pub struct GameRng(pub SmallRng);

impl GameRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(SmallRng::seed_from_u64(seed)),
            None => Self(SmallRng::from_os_rng()),
        }
    }
}
