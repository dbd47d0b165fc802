//! Physics module for collision detection
//!
//! Axis-aligned collider queries against the world; fixed-step timing lives in
//! [`crate::foundation::time::FixedTimestep`].

pub mod collision;

pub use collision::{
    collision_rect, entity_collision_rect, entity_collision_result, entity_collision_result_by_tag,
    CollisionResult,
};
