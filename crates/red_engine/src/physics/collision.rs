//! Collision queries
//!
//! Colliders are axis-aligned boxes placed relative to the entity's world
//! transform. Queries run against the entities matched by the
//! [`CollisionSystem`], so a disabled collider never collides.

use crate::ecs::components::{ColliderComponent, SceneComponent, Transform2DComponent};
use crate::ecs::systems::CollisionSystem;
use crate::ecs::{Entity, World};
use crate::foundation::math::Rect2;

/// Entities overlapping a source entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionResult {
    /// Entity the query was made for
    pub source: Entity,
    /// Overlapping entities in ascending ID order
    pub collided: Vec<Entity>,
}

impl CollisionResult {
    /// Whether anything overlaps the source
    pub fn is_colliding(&self) -> bool {
        !self.collided.is_empty()
    }

    /// Whether `entity` overlaps the source
    pub fn collided_with(&self, entity: Entity) -> bool {
        self.collided.contains(&entity)
    }
}

/// Collider placed at a world transform: `(position + offset, scale * size)`
pub fn collision_rect(world_transform: &Transform2DComponent, collider: &ColliderComponent) -> Rect2 {
    Rect2::new(
        world_transform.position.x + collider.collider.x,
        world_transform.position.y + collider.collider.y,
        world_transform.scale.x * collider.collider.w,
        world_transform.scale.y * collider.collider.h,
    )
}

/// World-space collision rectangle of `entity`
///
/// # Panics
/// If the entity has no [`ColliderComponent`].
pub fn entity_collision_rect(world: &World, entity: Entity) -> Rect2 {
    collision_rect(
        &world.world_transform(entity),
        world.get_component::<ColliderComponent>(entity),
    )
}

/// Whether either collider lists the other entity as an exception
pub fn is_collision_excepted(
    entity: Entity,
    collider: &ColliderComponent,
    other: Entity,
    other_collider: &ColliderComponent,
) -> bool {
    collider.excepts(other) || other_collider.excepts(entity)
}

/// Every collider overlapping `source`'s collider
pub fn entity_collision_result(world: &World, source: Entity) -> CollisionResult {
    collision_result_filtered(world, source, |_| true)
}

/// Colliders carrying `tag` that overlap `source`'s collider
pub fn entity_collision_result_by_tag(world: &World, source: Entity, tag: &str) -> CollisionResult {
    let tags = world.get_system::<CollisionSystem>().tag_index();
    collision_result_filtered(world, source, |target| tags.has_tag(target, tag))
}

fn collision_result_filtered<F>(world: &World, source: Entity, accept: F) -> CollisionResult
where
    F: Fn(Entity) -> bool,
{
    let mut result = CollisionResult {
        source,
        collided: Vec::new(),
    };
    let candidates = world.system_entities::<CollisionSystem>();
    if !candidates.contains(&source) {
        log::debug!(
            "Entity '{}' has no active collider; collision query is empty",
            source.id()
        );
        return result;
    }

    let source_collider = world.get_component::<ColliderComponent>(source);
    let source_rect = entity_collision_rect(world, source);
    for &target in candidates {
        if target == source || !accept(target) {
            continue;
        }
        let target_collider = world.get_component::<ColliderComponent>(target);
        if is_collision_excepted(source, source_collider, target, target_collider) {
            continue;
        }
        if source_rect.intersects(&entity_collision_rect(world, target)) {
            result.collided.push(target);
        }
    }

    if result.is_colliding() {
        log::trace!(
            "Entity '{}' ({}) collides with {} entity(ies)",
            source.id(),
            world
                .try_get_component::<SceneComponent>(source)
                .map_or("unnamed", |scene| scene.name.as_str()),
            result.collided.len()
        );
    }
    result
}
