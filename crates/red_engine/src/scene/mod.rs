//! Scene management
//!
//! The scene graph, hierarchical transform composition, the 2D camera and
//! scene loading.

pub mod camera;
pub mod loader;
pub mod scene_graph;
pub mod transform;

pub use camera::Camera2D;
pub use loader::{
    AnimationDescription, AnimationFrameDescription, ComponentDescription, FontDescription, MemorySceneLoader, NodeDescription, RonSceneLoader, SceneDescription,
    SceneLoadError, SceneLoader,
};
pub use scene_graph::{SceneGraph, SceneNode};
