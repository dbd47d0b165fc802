//! Configuration system
//!
//! Engine settings are plain serde structs loadable from TOML or RON files,
//! chosen by file extension.

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Engine Configuration
///
/// Core runtime limits and frame timing for the engine loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of live entities
    pub max_entities: usize,
    /// Fixed physics step in seconds
    pub physics_delta_time: f32,
    /// Longest wall-clock frame fed to the physics accumulator, in seconds
    pub max_frame_time: f32,
    /// Frame rate the loop paces itself to
    pub target_fps: u32,
    /// Scene loaded on the first frame
    pub initial_scene: Option<String>,
    /// Whether the collision system draws collider rectangles
    pub colliders_visible: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_entities: 5000,
            physics_delta_time: 0.01,
            max_frame_time: 0.25,
            target_fps: 60,
            initial_scene: None,
            colliders_visible: false,
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Builder pattern: set the live entity cap
    pub fn with_max_entities(mut self, max_entities: usize) -> Self {
        self.max_entities = max_entities;
        self
    }

    /// Builder pattern: set the scene loaded on startup
    pub fn with_initial_scene(mut self, path: impl Into<String>) -> Self {
        self.initial_scene = Some(path.into());
        self
    }

    /// Builder pattern: toggle collider debug drawing
    pub fn with_colliders_visible(mut self, visible: bool) -> Self {
        self.colliders_visible = visible;
        self
    }

    /// Check limits before the engine starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entities == 0 {
            return Err(ConfigError::Invalid("max_entities must be at least 1".into()));
        }
        if self.physics_delta_time <= 0.0 {
            return Err(ConfigError::Invalid("physics_delta_time must be positive".into()));
        }
        if self.max_frame_time < self.physics_delta_time {
            return Err(ConfigError::Invalid(
                "max_frame_time must be at least one physics step".into(),
            ));
        }
        if self.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be at least 1".into()));
        }
        Ok(())
    }
}
