//! # Red Engine
//!
//! A small 2D game engine runtime built around an entity-component-system
//! and a scene graph.
//!
//! ## Features
//!
//! - **ECS Architecture**: recycled entity IDs, signature-matched systems
//! - **Scene Graph**: parent/child transforms composed per frame
//! - **Scene Files**: RON scene descriptions instantiated into the world
//! - **Animation**: frame-based sprite animations advanced by frame time
//! - **Collision**: axis-aligned colliders with exceptions and tag queries
//! - **Render Queue**: backend-agnostic draw commands sorted by z-index
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use red_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         engine.world.prepare_scene_change("main.ron");
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
//!         // Update game logic
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, engine: &mut Engine) {
//!         // Cleanup resources
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     red_engine::foundation::logging::init();
//!     let config = EngineConfig::default();
//!     let loader = RonSceneLoader::new("assets/scenes");
//!     let mut app = MyApp;
//!     Engine::run(config, Box::new(loader), &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod scene;
pub mod physics;
pub mod render;
pub mod assets;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use config::EngineConfig;
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetCache, FontHandle, TextureHandle},
        ecs::{
            components::{
                AnimatedSpriteComponent, Animation, AnimationFrame, ColliderComponent,
                SceneComponent, SpriteComponent, TextLabelComponent, Transform2DComponent,
            },
            Component, ComponentSignature, Entity, System, SystemContext, SystemHooks, World,
        },
        foundation::{
            math::{Rect2, Vec2},
            time::{FixedTimestep, FrameLimiter, Timer},
        },
        physics::collision::{entity_collision_result, entity_collision_result_by_tag, CollisionResult},
        render::{Color, DrawCommand},
        scene::{Camera2D, RonSceneLoader, SceneGraph, SceneLoader},
        AppError, Application, Engine, EngineConfig, EngineError,
    };
}
