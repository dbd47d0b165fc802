//! Text label component

use crate::assets::FontHandle;
use crate::ecs::Component;
use crate::render::Color;

/// Line of text drawn at the entity's transform
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextLabelComponent {
    /// Text to draw
    pub text: String,
    /// Font to draw with; nothing is drawn while `None`
    pub font: Option<FontHandle>,
    /// Text color
    pub color: Color,
}

impl Component for TextLabelComponent {}

impl TextLabelComponent {
    /// Label showing `text` in `font`
    pub fn new(text: impl Into<String>, font: FontHandle) -> Self {
        Self {
            text: text.into(),
            font: Some(font),
            color: Color::WHITE,
        }
    }

    /// Builder pattern: set the color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}
