//! Component trait

/// Marker trait for components
///
/// Components are plain data. Implement this for every type that is registered
/// with [`crate::ecs::World::register_component`].
pub trait Component: 'static + Send + Sync {}
