//! 2D transform component
//!
//! Pure data: position, scale, rotation and draw order relative to the
//! entity's parent in the scene graph. World-space values are composed on
//! demand by [`crate::scene::transform`].

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::foundation::math::Vec2;

/// Local 2D transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform2DComponent {
    /// Offset from the parent
    pub position: Vec2,
    /// Per-axis scale factor
    pub scale: Vec2,
    /// Rotation in degrees
    pub rotation: f32,
    /// Draw order; higher draws later
    pub z_index: i32,
    /// Whether the parents' z-index is added to this one
    pub z_index_relative_to_parent: bool,
    /// Skip the camera when translating to screen space
    pub ignore_camera: bool,
}

impl Component for Transform2DComponent {}

impl Default for Transform2DComponent {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            scale: Vec2::new(1.0, 1.0),
            rotation: 0.0,
            z_index: 0,
            z_index_relative_to_parent: true,
            ignore_camera: false,
        }
    }
}

impl Transform2DComponent {
    /// Identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Identity transform moved to `position`
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Builder pattern: set the scale
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: set the rotation in degrees
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: set the z-index
    pub fn with_z_index(mut self, z_index: i32, relative_to_parent: bool) -> Self {
        self.z_index = z_index;
        self.z_index_relative_to_parent = relative_to_parent;
        self
    }

    /// Builder pattern: opt out of camera translation
    pub fn with_ignore_camera(mut self, ignore_camera: bool) -> Self {
        self.ignore_camera = ignore_camera;
        self
    }

    /// Move by `delta`
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Apply `child` on top of this (parent) transform
    ///
    /// Positions and rotations add, scales multiply per axis, z-indices add.
    /// Flags are taken from the child.
    pub fn combine(&self, child: &Self) -> Self {
        Self {
            position: self.position + child.position,
            scale: self.scale.component_mul(&child.scale),
            rotation: self.rotation + child.rotation,
            z_index: self.z_index + child.z_index,
            z_index_relative_to_parent: child.z_index_relative_to_parent,
            ignore_camera: child.ignore_camera,
        }
    }
}
