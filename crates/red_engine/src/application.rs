//! Application trait and lifecycle management

use crate::engine::{Engine, EngineError};
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive a game with [`Engine::run`].
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is initialized and before the first
    /// frame. Register components and systems, or prepare a scene change.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame before the world advances.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Render the application
    ///
    /// Called after the world advanced. The default runs the rendering
    /// systems and collects the frame's draw commands.
    fn render(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.render();
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Called once after the main loop stopped.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),

    /// Asset loading error
    #[error("Asset error: {0}")]
    Asset(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::scene::MemorySceneLoader;
    use std::time::{Duration, Instant};

    struct CountdownApp {
        frames_left: u32,
        initialized: bool,
        cleaned_up: bool,
        rendered: u32,
    }

    impl Application for CountdownApp {
        fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
            self.initialized = true;
            Ok(())
        }

        fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
            self.frames_left -= 1;
            if self.frames_left == 0 {
                engine.stop();
            }
            Ok(())
        }

        fn render(&mut self, engine: &mut Engine) -> Result<(), AppError> {
            self.rendered += 1;
            engine.render();
            Ok(())
        }

        fn cleanup(&mut self, _engine: &mut Engine) {
            self.cleaned_up = true;
        }
    }

    struct FailingApp;

    impl Application for FailingApp {
        fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
            Ok(())
        }

        fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
            Err(AppError::GameLogic("player fell out of the world".into()))
        }

        fn cleanup(&mut self, _engine: &mut Engine) {}
    }

    #[test]
    fn test_run_drives_lifecycle_until_stopped() {
        let mut app = CountdownApp {
            frames_left: 3,
            initialized: false,
            cleaned_up: false,
            rendered: 0,
        };
        Engine::run(EngineConfig::default(), Box::new(MemorySceneLoader::new()), &mut app).unwrap();

        assert!(app.initialized);
        assert!(app.cleaned_up);
        assert_eq!(app.rendered, 3);
    }

    #[test]
    fn test_run_holds_target_frame_rate() {
        let mut app = CountdownApp {
            frames_left: 4,
            initialized: false,
            cleaned_up: false,
            rendered: 0,
        };
        let config = EngineConfig {
            target_fps: 100,
            ..EngineConfig::default()
        };
        let start = Instant::now();
        Engine::run(config, Box::new(MemorySceneLoader::new()), &mut app).unwrap();

        // Four frames of 10ms each, none of them doing real work
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert_eq!(app.rendered, 4);
    }

    #[test]
    fn test_update_error_stops_run() {
        let result = Engine::run(EngineConfig::default(), Box::new(MemorySceneLoader::new()), &mut FailingApp);
        assert!(matches!(result, Err(EngineError::ApplicationError(_))));
    }
}
