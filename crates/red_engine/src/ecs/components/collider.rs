//! Collider component
//!
//! Axis-aligned box relative to the entity's world transform. The world
//! rectangle is `(position + collider.xy, scale * collider.wh)`.

use crate::ecs::{Component, Entity};
use crate::foundation::math::Rect2;
use crate::render::Color;

/// Axis-aligned collision box
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderComponent {
    /// Offset (x, y) and unscaled size (w, h)
    pub collider: Rect2,
    /// Color used when colliders are drawn for debugging
    pub color: Color,
    /// Entities this collider never reports
    pub collision_exceptions: Vec<Entity>,
}

impl Component for ColliderComponent {}

impl Default for ColliderComponent {
    fn default() -> Self {
        Self {
            collider: Rect2::default(),
            color: Color::new(0.37, 0.8, 0.57, 0.75),
            collision_exceptions: Vec::new(),
        }
    }
}

impl ColliderComponent {
    /// Collider covering `collider`
    pub fn new(collider: Rect2) -> Self {
        Self {
            collider,
            ..Self::default()
        }
    }

    /// Builder pattern: never report `entity`
    pub fn with_exception(mut self, entity: Entity) -> Self {
        if !self.collision_exceptions.contains(&entity) {
            self.collision_exceptions.push(entity);
        }
        self
    }

    /// Builder pattern: set the debug color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Whether `entity` is in the exception list
    pub fn excepts(&self, entity: Entity) -> bool {
        self.collision_exceptions.contains(&entity)
    }
}
