//! ECS Components module
//!
//! Built-in components registered by every [`World`](crate::ecs::World).

pub mod animated_sprite;
pub mod collider;
pub mod scene;
pub mod sprite;
pub mod text_label;
pub mod transform;

pub use animated_sprite::{AnimatedSpriteComponent, Animation, AnimationFrame};
pub use collider::ColliderComponent;
pub use scene::SceneComponent;
pub use sprite::SpriteComponent;
pub use text_label::TextLabelComponent;
pub use transform::Transform2DComponent;
