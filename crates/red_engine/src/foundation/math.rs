//! Math utilities and types
//!
//! Provides the 2D math types used by transforms, cameras and colliders.

use serde::{Deserialize, Serialize};

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Tolerance used by float comparisons in collision tests
pub const FLOAT_EPSILON: f32 = 0.001;

/// Axis-aligned rectangle described by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect2 {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Rect2 {
    /// Create a rectangle from its corner and size
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle from a position and a size vector
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    /// Top-left corner
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Width and height as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Float-tolerant overlap test; touching edges count as overlapping
    pub fn intersects(&self, other: &Self) -> bool {
        utils::is_float_greater_or_equal(self.x + self.w, other.x)
            && utils::is_float_greater_or_equal(other.x + other.w, self.x)
            && utils::is_float_greater_or_equal(self.y + self.h, other.y)
            && utils::is_float_greater_or_equal(other.y + other.h, self.y)
    }
}

/// Math utility functions
pub mod utils {
    use super::FLOAT_EPSILON;

    /// `a >= b` with [`FLOAT_EPSILON`] slack
    pub fn is_float_greater_or_equal(a: f32, b: f32) -> bool {
        (a - b).abs() < FLOAT_EPSILON || a > b
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}
