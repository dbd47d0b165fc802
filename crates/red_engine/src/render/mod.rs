//! # Rendering
//!
//! Platform-independent half of rendering: colors, draw commands and the
//! per-frame render queue. Rendering systems fill the queue; the platform
//! layer drains it with [`crate::ecs::World::take_draw_commands`].

pub mod color;
pub mod render_queue;

pub use color::Color;
pub use render_queue::{DrawCommand, RenderQueue};
