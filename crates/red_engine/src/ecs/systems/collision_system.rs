//! ECS collision system
//!
//! Tracks every entity with a transform and a collider. The matched set is
//! what [`crate::physics::collision`] queries run against; the tag index
//! narrows queries down to a tag. When colliders are visible the system also
//! draws each collider box on top of the scene.

use crate::ecs::components::{ColliderComponent, Transform2DComponent};
use crate::ecs::system::{System, SystemContext, SystemHooks, TagIndex};
use crate::ecs::{ComponentSignature, Entity, World};
use crate::physics::collision::collision_rect;
use crate::render::DrawCommand;

/// Z-index collider boxes are drawn at
pub const COLLIDER_DEBUG_Z_INDEX: i32 = i32::MAX;

/// Collider bookkeeping and debug drawing
#[derive(Debug, Default)]
pub struct CollisionSystem {
    tags: TagIndex,
    colliders_visible: bool,
}

impl CollisionSystem {
    /// Create the system; `colliders_visible` turns on debug drawing
    pub fn new(colliders_visible: bool) -> Self {
        Self {
            tags: TagIndex::new(),
            colliders_visible,
        }
    }

    /// Register with `world`, matching transform + collider entities
    pub fn register(world: &mut World, colliders_visible: bool) -> &mut Self {
        let signature = ComponentSignature::from_types(&[
            world.component_type::<Transform2DComponent>(),
            world.component_type::<ColliderComponent>(),
        ]);
        let mut hooks = SystemHooks::TAG_CHANGED;
        if colliders_visible {
            hooks |= SystemHooks::RENDER;
        }
        world.register_system(Self::new(colliders_visible), signature, hooks)
    }

    /// Tag index of the matched entities
    pub fn tag_index(&self) -> &TagIndex {
        &self.tags
    }

    /// Whether collider boxes are drawn
    pub fn colliders_visible(&self) -> bool {
        self.colliders_visible
    }
}

impl System for CollisionSystem {
    fn on_render(&mut self, ctx: &mut SystemContext<'_>) {
        if !self.colliders_visible {
            return;
        }
        for entity in ctx.entity_list() {
            let world_transform = ctx.world_transform(entity);
            let collider = ctx.component::<ColliderComponent>(entity);
            // Offset is in world units, so the camera maps the finished rect
            let rect = collision_rect(&world_transform, collider);
            let command = DrawCommand::Rectangle {
                rect: if world_transform.ignore_camera {
                    rect
                } else {
                    ctx.camera.apply_rect(&rect)
                },
                color: collider.color,
                z_index: COLLIDER_DEBUG_Z_INDEX,
            };
            ctx.submit(command);
        }
    }

    fn on_entity_tags_updated(&mut self, entity: Entity, old_tags: &[String], new_tags: &[String]) {
        self.tags.update(entity, old_tags, new_tags);
    }

    fn on_entity_tags_removed(&mut self, entity: Entity, tags: &[String]) {
        self.tags.remove(entity, tags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Rect2, Vec2};
    use crate::scene::Camera2D;

    fn debug_rects(world: &mut World) -> Vec<Rect2> {
        world.render_systems();
        world
            .take_draw_commands()
            .into_iter()
            .filter_map(|command| match command {
                DrawCommand::Rectangle { rect, .. } => Some(rect),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_debug_rect_follows_zoomed_camera() {
        let mut world = World::new();
        CollisionSystem::register(&mut world, true);
        let entity = world.create_entity();
        world.add_component(entity, Transform2DComponent::at(Vec2::new(10.0, 10.0)));
        world.add_component(entity, ColliderComponent::new(Rect2::new(4.0, 2.0, 6.0, 6.0)));
        world.set_camera(Camera2D::new(Vec2::new(5.0, 5.0)).with_zoom(Vec2::new(2.0, 2.0)));

        // World rect (14, 12, 6, 6) seen through the camera
        assert_eq!(debug_rects(&mut world), vec![Rect2::new(18.0, 14.0, 12.0, 12.0)]);

        world.get_component_mut::<Transform2DComponent>(entity).ignore_camera = true;
        assert_eq!(debug_rects(&mut world), vec![Rect2::new(14.0, 12.0, 6.0, 6.0)]);
    }

    #[test]
    fn test_hidden_colliders_register_no_render_hook() {
        let mut world = World::new();
        CollisionSystem::register(&mut world, false);
        let entity = world.create_entity();
        world.add_component(entity, Transform2DComponent::default());
        world.add_component(entity, ColliderComponent::new(Rect2::new(0.0, 0.0, 1.0, 1.0)));

        assert!(debug_rects(&mut world).is_empty());
        assert!(!world.get_system::<CollisionSystem>().colliders_visible());
    }
}
