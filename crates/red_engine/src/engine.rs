//! Core engine implementation

use thiserror::Error;

use crate::{
    application::Application,
    assets::AssetCache,
    config::{ConfigError, EngineConfig},
    ecs::{systems, World},
    foundation::time::{FixedTimestep, FrameLimiter, Timer},
    render::DrawCommand,
    scene::{SceneLoadError, SceneLoader},
};

/// Main engine struct
///
/// The engine owns the world and drives the frame: scene changes happen at
/// frame boundaries, variable-step systems run once per frame, fixed-step
/// systems run as often as the accumulated time allows, and queued entities
/// are destroyed last.
pub struct Engine {
    /// ECS world containing all entities, components, and systems
    pub world: World,

    /// Loaded textures and fonts
    pub assets: AssetCache,

    scene_loader: Box<dyn SceneLoader>,

    /// Frame timing
    timer: Timer,

    physics_timestep: FixedTimestep,

    /// Paces the main loop to `target_fps`
    frame_limiter: FrameLimiter,

    /// Draw commands produced by the last render
    draw_commands: Vec<DrawCommand>,

    config: EngineConfig,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    ///
    /// Registers the built-in systems and, if configured, prepares the
    /// initial scene so it is loaded on the first frame.
    pub fn new(config: EngineConfig, scene_loader: Box<dyn SceneLoader>) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");
        config.validate()?;

        let mut world = World::from_config(&config);
        systems::register_builtin_systems(&mut world, &config);
        if let Some(initial_scene) = &config.initial_scene {
            world.prepare_scene_change(initial_scene.clone());
        }

        Ok(Self {
            world,
            assets: AssetCache::new(),
            scene_loader,
            timer: Timer::new(),
            physics_timestep: FixedTimestep::new(config.physics_delta_time, config.max_frame_time),
            frame_limiter: FrameLimiter::new(config.target_fps),
            draw_commands: Vec::new(),
            config,
            running: true,
        })
    }

    /// Run the engine main loop with the given application
    ///
    /// Each frame sleeps out whatever is left of its `target_fps` budget.
    /// The loop ends once the application calls [`Engine::stop`].
    pub fn run<T: Application>(
        config: EngineConfig,
        scene_loader: Box<dyn SceneLoader>,
        app: &mut T,
    ) -> Result<(), EngineError> {
        let mut engine = Self::new(config, scene_loader)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        log::info!("Starting main loop...");

        while engine.running {
            engine.timer.update();
            let delta_time = engine.timer.delta_time();

            app.update(&mut engine, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {e}")))?;

            engine.update(delta_time)?;

            app.render(&mut engine)
                .map_err(|e| EngineError::ApplicationError(format!("App render: {e}")))?;

            engine.frame_limiter.wait();
        }

        app.cleanup(&mut engine);

        log::info!(
            "Engine shutdown complete after {} frame(s)",
            engine.timer.frame_count()
        );
        Ok(())
    }

    /// Advance the world by one frame
    pub fn update(&mut self, delta_time: f32) -> Result<(), EngineError> {
        if self.world.has_scene_to_create() {
            self.world
                .change_to_scene(self.scene_loader.as_ref(), &mut self.assets)?;
        }

        self.world.update_systems(delta_time);

        let physics_steps = self.physics_timestep.advance(delta_time);
        let physics_delta = self.physics_timestep.step();
        for _ in 0..physics_steps {
            self.world.physics_update_systems(physics_delta);
        }

        if self.world.has_scene_to_destroy() {
            self.world.destroy_scene();
        }
        self.world.destroy_queued_entities();

        Ok(())
    }

    /// Run the rendering systems and collect this frame's draw commands
    pub fn render(&mut self) {
        self.world.render_systems();
        self.draw_commands = self.world.take_draw_commands();
    }

    /// Draw commands of the last rendered frame, in draw order
    pub fn draw_commands(&self) -> &[DrawCommand] {
        &self.draw_commands
    }

    /// Ask the main loop to exit after the current frame
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the main loop keeps going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Frame timer
    pub fn timer(&self) -> &Timer {
        &self.timer
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene could not be loaded
    #[error("Scene error: {0}")]
    Scene(#[from] SceneLoadError),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{ColliderComponent, Transform2DComponent};
    use crate::ecs::systems::CollisionSystem;
    use crate::ecs::{ComponentSignature, System, SystemContext, SystemHooks};
    use crate::foundation::math::{Rect2, Vec2};
    use crate::scene::{ComponentDescription, MemorySceneLoader, NodeDescription, SceneDescription};

    #[derive(Default)]
    struct StepCounter {
        updates: u32,
        physics_steps: u32,
    }

    impl System for StepCounter {
        fn on_update(&mut self, _ctx: &mut SystemContext<'_>, _delta_time: f32) {
            self.updates += 1;
        }

        fn on_physics_update(&mut self, _ctx: &mut SystemContext<'_>, _delta_time: f32) {
            self.physics_steps += 1;
        }
    }

    fn level() -> SceneDescription {
        SceneDescription::new(
            NodeDescription::new("Level")
                .with_component(ComponentDescription::Transform2D(Transform2DComponent::default()))
                .with_child(
                    NodeDescription::new("Wall")
                        .with_tags(&["wall"])
                        .with_component(ComponentDescription::Transform2D(Transform2DComponent::at(
                            Vec2::new(10.0, 0.0),
                        )))
                        .with_component(ComponentDescription::Collider {
                            rect: Rect2::new(0.0, 0.0, 4.0, 4.0),
                            color: None,
                        }),
                ),
        )
    }

    fn engine_with_level() -> Engine {
        let loader = MemorySceneLoader::new().with_scene("level.ron", level());
        let config = EngineConfig::default().with_initial_scene("level.ron");
        Engine::new(config, Box::new(loader)).unwrap()
    }

    #[test]
    fn test_initial_scene_loads_on_first_frame() {
        let mut engine = engine_with_level();
        assert!(engine.world.current_scene().is_empty());

        engine.update(0.016).unwrap();
        assert_eq!(engine.world.current_scene().len(), 2);
        assert_eq!(engine.world.current_scene_path(), Some("level.ron"));
        assert_eq!(engine.world.system_entities::<CollisionSystem>().len(), 1);
    }

    #[test]
    fn test_fixed_steps_follow_accumulated_time() {
        let mut engine = Engine::new(EngineConfig::default(), Box::new(MemorySceneLoader::new())).unwrap();
        engine.world.register_system(
            StepCounter::default(),
            ComponentSignature::EMPTY,
            SystemHooks::UPDATE | SystemHooks::PHYSICS_UPDATE,
        );

        engine.update(0.035).unwrap();
        engine.update(0.001).unwrap();

        let counter = engine.world.get_system::<StepCounter>();
        assert_eq!(counter.updates, 2);
        assert_eq!(counter.physics_steps, 3);
    }

    #[test]
    fn test_missing_scene_is_an_error() {
        let config = EngineConfig::default().with_initial_scene("nowhere.ron");
        let mut engine = Engine::new(config, Box::new(MemorySceneLoader::new())).unwrap();
        assert!(matches!(
            engine.update(0.016),
            Err(EngineError::Scene(SceneLoadError::NotFound(_)))
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig::default().with_max_entities(0);
        assert!(matches!(
            Engine::new(config, Box::new(MemorySceneLoader::new())),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_scene_change_tears_down_old_scene() {
        let mut engine = engine_with_level();
        engine.update(0.016).unwrap();
        let old_entities = engine.world.current_scene().walk();

        engine.world.prepare_scene_change("level.ron");
        assert!(engine.world.has_scene_to_destroy());
        assert!(!engine.world.has_scene_to_create());

        // Teardown frame
        engine.update(0.016).unwrap();
        assert!(engine.world.current_scene().is_empty());
        assert!(old_entities.iter().all(|&e| !engine.world.is_alive(e)));
        assert!(engine.world.has_scene_to_create());

        // Load frame
        engine.update(0.016).unwrap();
        assert_eq!(engine.world.current_scene().len(), 2);
        assert_eq!(engine.world.alive_entities(), 2);
    }

    #[test]
    fn test_render_collects_collider_boxes_when_visible() {
        let loader = MemorySceneLoader::new().with_scene("level.ron", level());
        let config = EngineConfig::default()
            .with_initial_scene("level.ron")
            .with_colliders_visible(true);
        let mut engine = Engine::new(config, Box::new(loader)).unwrap();

        engine.update(0.016).unwrap();
        engine.render();

        let wall = engine.world.system_entities::<CollisionSystem>().iter().next().copied().unwrap();
        assert!(engine.world.has_component::<ColliderComponent>(wall));
        assert_eq!(
            engine.draw_commands(),
            &[DrawCommand::Rectangle {
                rect: Rect2::new(10.0, 0.0, 4.0, 4.0),
                color: ColliderComponent::default().color,
                z_index: crate::ecs::systems::collision_system::COLLIDER_DEBUG_Z_INDEX,
            }]
        );
    }
}
