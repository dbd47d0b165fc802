//! # Render Queue
//!
//! Collects the draw commands submitted by rendering systems during a frame
//! and hands them to the platform layer in draw order.
//!
//! ## Architecture
//!
//! - **DrawCommand**: one sprite, text label or debug rectangle in screen space
//! - **RenderQueue**: accumulates commands; [`RenderQueue::flush`] sorts them by
//!   z-index (stable, so submission order breaks ties) and empties the queue

use crate::assets::{FontHandle, TextureHandle};
use crate::ecs::Entity;
use crate::foundation::math::{Rect2, Vec2};

use super::Color;

/// Individual draw instruction, already translated by the camera
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Textured quad
    Sprite {
        /// Entity that submitted the command
        entity: Entity,
        /// Texture to sample
        texture: TextureHandle,
        /// Region of the texture
        source: Rect2,
        /// Screen-space destination (scale already applied)
        destination: Rect2,
        /// Rotation in degrees
        rotation: f32,
        /// Tint
        modulate: Color,
        /// Mirror horizontally
        flip_x: bool,
        /// Mirror vertically
        flip_y: bool,
        /// Draw order
        z_index: i32,
    },
    /// Line of text
    Text {
        /// Entity that submitted the command
        entity: Entity,
        /// Font to draw with
        font: FontHandle,
        /// Text to draw
        text: String,
        /// Screen-space baseline origin
        position: Vec2,
        /// Uniform scale
        scale: f32,
        /// Text color
        color: Color,
        /// Draw order
        z_index: i32,
    },
    /// Untextured rectangle, used for collider debugging
    Rectangle {
        /// Screen-space rectangle
        rect: Rect2,
        /// Fill color
        color: Color,
        /// Draw order
        z_index: i32,
    },
}

impl DrawCommand {
    /// Draw order of the command
    pub fn z_index(&self) -> i32 {
        match self {
            Self::Sprite { z_index, .. } | Self::Text { z_index, .. } | Self::Rectangle { z_index, .. } => {
                *z_index
            }
        }
    }
}

/// Frame-local list of draw commands
#[derive(Debug, Default)]
pub struct RenderQueue {
    commands: Vec<DrawCommand>,
}

impl RenderQueue {
    /// Create a new empty render queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a render queue with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    /// Add a draw command
    pub fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Get total number of commands
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Take every command in draw order, leaving the queue empty
    pub fn flush(&mut self) -> Vec<DrawCommand> {
        let mut commands = std::mem::take(&mut self.commands);
        commands.sort_by_key(DrawCommand::z_index);
        commands
    }

    /// Drop every command without drawing
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(z_index: i32, x: f32) -> DrawCommand {
        DrawCommand::Rectangle {
            rect: Rect2::new(x, 0.0, 1.0, 1.0),
            color: Color::WHITE,
            z_index,
        }
    }

    #[test]
    fn test_render_queue_creation() {
        let queue = RenderQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.command_count(), 0);
    }

    #[test]
    fn test_flush_sorts_by_z_and_keeps_ties_in_order() {
        let mut queue = RenderQueue::with_capacity(4);
        queue.submit(rect(2, 0.0));
        queue.submit(rect(-1, 1.0));
        queue.submit(rect(2, 2.0));
        queue.submit(rect(0, 3.0));

        let flushed = queue.flush();
        let order: Vec<i32> = flushed.iter().map(DrawCommand::z_index).collect();
        assert_eq!(order, vec![-1, 0, 2, 2]);
        assert_eq!(flushed[2], rect(2, 0.0));
        assert_eq!(flushed[3], rect(2, 2.0));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear_queue() {
        let mut queue = RenderQueue::new();
        queue.submit(rect(0, 0.0));
        queue.clear();
        assert!(queue.flush().is_empty());
    }
}
