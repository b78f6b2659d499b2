use std::collections::HashMap;

use bevy_ecs::{
    event::EventWriter,
    query::With,
    resource::Resource,
    system::{Query, Res, ResMut},
};
use tracing::{debug, trace};

use crate::{
    error::GameError,
    events::{GameCommand, RenderCue},
    map::direction::Direction,
    systems::{
        components::{BufferedDirection, PlayerControlled},
        state::{GameStage, PauseState},
    },
};

/// Maps host key names to engine commands.
///
/// Key names follow the DOM `KeyboardEvent.key` convention (`ArrowUp`, `w`, `p`...). Keys
/// without a binding are ignored.
#[derive(Debug, Clone, Resource)]
pub struct Bindings {
    key_bindings: HashMap<String, GameCommand>,
}

impl Default for Bindings {
    fn default() -> Self {
        let mut key_bindings = HashMap::new();

        // Player movement
        for (keys, direction) in [
            (["ArrowUp", "w", "W"], Direction::Up),
            (["ArrowDown", "s", "S"], Direction::Down),
            (["ArrowLeft", "a", "A"], Direction::Left),
            (["ArrowRight", "d", "D"], Direction::Right),
        ] {
            for key in keys {
                key_bindings.insert(key.to_string(), GameCommand::MovePlayer(direction));
            }
        }

        // Game actions
        key_bindings.insert("p".to_string(), GameCommand::TogglePause);
        key_bindings.insert("P".to_string(), GameCommand::TogglePause);
        key_bindings.insert("Escape".to_string(), GameCommand::TogglePause);

        Self { key_bindings }
    }
}

impl Bindings {
    /// Looks up the command bound to a key.
    pub fn command(&self, key: &str) -> Option<GameCommand> {
        self.key_bindings.get(key).copied()
    }

    /// Binds a key, replacing any previous binding for it.
    pub fn bind(&mut self, key: impl Into<String>, command: GameCommand) {
        self.key_bindings.insert(key.into(), command);
    }
}

/// Commands received since the last tick, in arrival order.
///
/// Hosts push into this at any time; the queue is only drained at the start of a tick.
#[derive(Resource, Debug, Default, Clone)]
pub struct InputQueue(pub Vec<GameCommand>);

impl InputQueue {
    pub fn push(&mut self, command: GameCommand) {
        self.0.push(command);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Applies the queued commands at the tick boundary.
///
/// Pause toggles are applied in order. A direction is only accepted while the game is
/// playing and not paused at that point in the queue; of several accepted directions the
/// last one wins.
pub fn command_system(
    mut queue: ResMut<InputQueue>,
    mut pause: ResMut<PauseState>,
    stage: Res<GameStage>,
    mut players: Query<&mut BufferedDirection, With<PlayerControlled>>,
    mut cues: EventWriter<RenderCue>,
    mut errors: EventWriter<GameError>,
) {
    if queue.is_empty() {
        return;
    }

    let mut buffered_direction = match players.single_mut() {
        Ok(buffered) => buffered,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for command system: {}",
                e
            )));
            queue.clear();
            return;
        }
    };

    for command in queue.0.drain(..) {
        match command {
            GameCommand::TogglePause => {
                pause.toggle();
                debug!(paused = pause.active(), "Pause toggled");
                cues.write(RenderCue::Paused(pause.active()));
            }
            GameCommand::MovePlayer(direction) => {
                if pause.active() || !matches!(*stage, GameStage::Playing) {
                    trace!(%direction, "Direction ignored outside of active play");
                    continue;
                }
                buffered_direction.0 = Some(direction);
            }
        }
    }
}
