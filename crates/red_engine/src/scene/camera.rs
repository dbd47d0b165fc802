//! 2D camera

use serde::{Deserialize, Serialize};

use crate::ecs::components::Transform2DComponent;
use crate::foundation::math::{Rect2, Vec2};

/// Maps world-space transforms to screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera2D {
    /// World position of the top-left corner of the view
    pub viewport: Vec2,
    /// Per-axis zoom factor
    pub zoom: Vec2,
    /// Screen-space offset applied before zoom
    pub offset: Vec2,
    /// Region the viewport is expected to stay inside
    pub boundary: Rect2,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            viewport: Vec2::zeros(),
            zoom: Vec2::new(1.0, 1.0),
            offset: Vec2::zeros(),
            boundary: Rect2::new(-10_000_000.0, -10_000_000.0, 20_000_000.0, 20_000_000.0),
        }
    }
}

impl Camera2D {
    /// Camera looking at `viewport` without zoom
    pub fn new(viewport: Vec2) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Builder pattern: set the zoom
    pub fn with_zoom(mut self, zoom: Vec2) -> Self {
        self.zoom = zoom;
        self
    }

    /// Builder pattern: set the offset
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Move the viewport, clamped to the boundary
    pub fn set_viewport(&mut self, viewport: Vec2) {
        let max_x = (self.boundary.x + self.boundary.w).max(self.boundary.x);
        let max_y = (self.boundary.y + self.boundary.h).max(self.boundary.y);
        self.viewport = Vec2::new(
            viewport.x.clamp(self.boundary.x, max_x),
            viewport.y.clamp(self.boundary.y, max_y),
        );
    }

    /// World space to screen space; rotation and z are untouched
    pub fn apply(&self, transform: &Transform2DComponent) -> Transform2DComponent {
        let mut result = *transform;
        result.position = (transform.position - self.viewport + self.offset).component_mul(&self.zoom);
        result.scale = transform.scale.component_mul(&self.zoom);
        result
    }

    /// World-space rectangle to screen space
    pub fn apply_rect(&self, rect: &Rect2) -> Rect2 {
        let position = (Vec2::new(rect.x, rect.y) - self.viewport + self.offset).component_mul(&self.zoom);
        Rect2::new(position.x, position.y, rect.w * self.zoom.x, rect.h * self.zoom.y)
    }

    /// Inverse of [`Self::apply`]
    pub fn unapply(&self, transform: &Transform2DComponent) -> Transform2DComponent {
        let mut result = *transform;
        result.position = transform.position.component_div(&self.zoom) + self.viewport - self.offset;
        result.scale = transform.scale.component_div(&self.zoom);
        result
    }
}
