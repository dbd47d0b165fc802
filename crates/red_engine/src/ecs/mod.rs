//! Entity-Component-System implementation
//!
//! Entities are plain IDs, components live in dense per-type arrays and
//! systems are matched to entities through component signatures. [`World`]
//! ties the pieces together with the scene graph.

pub mod component;
pub mod components;
pub mod entity;
pub mod registry;
pub mod signature;
pub mod storage;
pub mod system;
pub mod systems;
pub mod world;

pub use component::Component;
pub use entity::{Entity, EntityRegistry, NULL_ENTITY};
pub use registry::SystemRegistry;
pub use signature::{ComponentSignature, ComponentType, MAX_COMPONENT_TYPES};
pub use storage::{ComponentArray, ComponentStore};
pub use system::{FrameRequests, System, SystemContext, SystemHooks, TagIndex};
pub use world::World;

#[cfg(test)]
mod tests;
