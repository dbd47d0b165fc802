//! Sprite component

use crate::assets::TextureHandle;
use crate::ecs::Component;
use crate::foundation::math::Rect2;
use crate::render::Color;

/// Textured quad drawn at the entity's transform
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteComponent {
    /// Texture to sample; nothing is drawn while `None`
    pub texture: Option<TextureHandle>,
    /// Region of the texture to draw, in pixels
    pub draw_source: Rect2,
    /// Mirror horizontally
    pub flip_x: bool,
    /// Mirror vertically
    pub flip_y: bool,
    /// Tint multiplied with the texture
    pub modulate: Color,
}

impl Component for SpriteComponent {}

impl Default for SpriteComponent {
    fn default() -> Self {
        Self {
            texture: None,
            draw_source: Rect2::default(),
            flip_x: false,
            flip_y: false,
            modulate: Color::WHITE,
        }
    }
}

impl SpriteComponent {
    /// Sprite drawing `draw_source` of `texture`
    pub fn new(texture: TextureHandle, draw_source: Rect2) -> Self {
        Self {
            texture: Some(texture),
            draw_source,
            ..Self::default()
        }
    }

    /// Builder pattern: set the tint
    pub fn with_modulate(mut self, modulate: Color) -> Self {
        self.modulate = modulate;
        self
    }

    /// Builder pattern: set mirroring
    pub fn with_flip(mut self, flip_x: bool, flip_y: bool) -> Self {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
        self
    }
}
