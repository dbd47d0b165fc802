//! Integration tests for the ECS world, scene graph and built-in systems

mod world_properties;

use crate::ecs::components::{ColliderComponent, SceneComponent, Transform2DComponent};
use crate::ecs::{Entity, World};
use crate::foundation::math::{Rect2, Vec2};

/// Entity with a scene component and a transform at `position`
fn spawn(world: &mut World, name: &str, position: Vec2) -> Entity {
    let entity = world.create_entity();
    world.add_component(entity, SceneComponent::new(name));
    world.add_component(entity, Transform2DComponent::at(position));
    entity
}

/// Entity at `position` with a `size` collider at zero offset
fn spawn_collider(world: &mut World, name: &str, position: Vec2, size: Vec2) -> Entity {
    let entity = spawn(world, name, position);
    world.add_component(
        entity,
        ColliderComponent::new(Rect2::from_position_size(Vec2::zeros(), size)),
    );
    entity
}
