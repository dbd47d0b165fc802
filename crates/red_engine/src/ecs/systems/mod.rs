//! ECS Systems module
//!
//! Built-in systems the engine registers on startup.

pub mod collision_system;
pub mod rendering_system;

pub use collision_system::CollisionSystem;
pub use rendering_system::{AnimatedSpriteRenderingSystem, SpriteRenderingSystem, TextRenderingSystem};

use crate::config::EngineConfig;
use crate::ecs::World;

/// Register the collision, sprite, animated sprite and text systems, in that order
pub fn register_builtin_systems(world: &mut World, config: &EngineConfig) {
    CollisionSystem::register(world, config.colliders_visible);
    SpriteRenderingSystem::register(world);
    AnimatedSpriteRenderingSystem::register(world);
    TextRenderingSystem::register(world);
}
