use bevy_ecs::entity::Entity;
use bevy_ecs::event::EventWriter;
use bevy_ecs::query::With;
use bevy_ecs::system::Query;
use smallvec::SmallVec;
use tracing::trace;

use crate::error::GameError;
use crate::events::CollisionEvent;
use crate::systems::components::{
    Collider, Ghost, GhostCollider, GhostMode, Item, ItemCollider, ItemKind, PacmanCollider, Position,
};

/// Overlap test between two entities.
///
/// The colliders are treated as boxes: the entities overlap when, on both axes
/// independently, the gap between their centres is at most the sum of their radii. Touching
/// counts as overlapping.
pub fn detect(pos_a: &Position, collider_a: &Collider, pos_b: &Position, collider_b: &Collider) -> bool {
    let reach = collider_a.radius + collider_b.radius;
    let gap = (pos_a.0 - pos_b.0).abs();
    gap.x <= reach && gap.y <= reach
}

/// Detects overlapping entities and emits typed collision events for the dispatcher.
///
/// Nothing is mutated here. Events are written in a fixed order: item events first, then
/// [`CollisionEvent::BoardCleared`] if those items finish the board, then ghost contacts in
/// ghost order. A contact with a retreating ghost produces nothing.
pub fn collision_system(
    pacman_query: Query<(&Position, &Collider), With<PacmanCollider>>,
    item_query: Query<(Entity, &Item, &Position, &Collider), With<ItemCollider>>,
    ghost_query: Query<(Entity, &Ghost, &GhostMode, &Position, &Collider), With<GhostCollider>>,
    mut events: EventWriter<CollisionEvent>,
    mut errors: EventWriter<GameError>,
) {
    let (pacman_pos, pacman_collider) = match pacman_query.single() {
        Ok(pacman) => pacman,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for collision system: {}",
                e
            )));
            return;
        }
    };

    // Check PACMAN × ITEM collisions
    let mut pellets_left = 0usize;
    let mut pellets_hit = 0usize;
    for (item_entity, item, item_pos, item_collider) in item_query.iter() {
        if item.eaten {
            continue;
        }
        if item.kind == ItemKind::Pellet {
            pellets_left += 1;
        }
        if !detect(pacman_pos, pacman_collider, item_pos, item_collider) {
            continue;
        }

        trace!(entity = ?item_entity, kind = ?item.kind, "Item collision");
        match item.kind {
            ItemKind::Pellet => {
                pellets_hit += 1;
                events.write(CollisionEvent::PelletEaten(item_entity));
            }
            ItemKind::PowerUp => {
                events.write(CollisionEvent::PowerUpEaten(item_entity));
            }
        }
    }

    if pellets_hit > 0 && pellets_hit == pellets_left {
        events.write(CollisionEvent::BoardCleared);
    }

    // Check PACMAN × GHOST collisions
    let mut contacts: SmallVec<[(Ghost, Entity, GhostMode); 4]> = ghost_query
        .iter()
        .filter(|(_, _, _, ghost_pos, ghost_collider)| detect(pacman_pos, pacman_collider, ghost_pos, ghost_collider))
        .map(|(entity, ghost, mode, _, _)| (*ghost, entity, *mode))
        .collect();
    contacts.sort_by_key(|(ghost, _, _)| *ghost);

    for (ghost, entity, mode) in contacts {
        trace!(ghost = %ghost, mode = %mode, "Ghost collision");
        match mode {
            GhostMode::Chase => {
                events.write(CollisionEvent::PacmanHit(entity));
            }
            GhostMode::Scared => {
                events.write(CollisionEvent::GhostCaptured(entity));
            }
            GhostMode::Retreating => {}
        }
    }
}
