//! Scene loading
//!
//! A scene file describes a tree of named nodes with tags and components.
//! Loading one creates an entity per node, attaches its components without
//! notifying systems and returns the finished [`SceneGraph`]; the world
//! reports every node to the systems once the scene becomes current.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::SceneGraph;
use crate::assets::AssetCache;
use crate::ecs::components::{
    AnimatedSpriteComponent, Animation, AnimationFrame, ColliderComponent, SceneComponent,
    SpriteComponent, TextLabelComponent, Transform2DComponent,
};
use crate::ecs::{Entity, World};
use crate::foundation::math::Rect2;
use crate::render::Color;

/// Scene loading errors
#[derive(Error, Debug)]
pub enum SceneLoadError {
    /// Scene file could not be read
    #[error("Failed to read scene '{path}': {source}")]
    Io {
        /// Scene path
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Scene file is not a valid description
    #[error("Failed to parse scene '{path}': {message}")]
    Parse {
        /// Scene path
        path: String,
        /// Parser message
        message: String,
    },

    /// No scene is known under the path
    #[error("Scene not found: {0}")]
    NotFound(String),

    /// A text label names a font that is neither declared nor loaded
    #[error("Node '{node}' uses unknown font '{font_uid}'")]
    UnknownFont {
        /// Node name
        node: String,
        /// Font identifier
        font_uid: String,
    },

    /// An animated sprite starts on an animation it does not define
    #[error("Node '{node}' starts on undefined animation '{animation}'")]
    UnknownAnimation {
        /// Node name
        node: String,
        /// Animation name
        animation: String,
    },
}

/// Font a scene needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontDescription {
    /// Identifier text labels refer to
    pub uid: String,
    /// Font file
    pub path: String,
    /// Point size
    pub size: u32,
}

/// Frame of an [`AnimationDescription`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrameDescription {
    /// Texture file
    pub texture_path: String,
    /// Region of the texture
    pub draw_source: Rect2,
}

/// Named frame sequence of an animated sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationDescription {
    /// Animation name
    pub name: String,
    /// Seconds per frame
    pub frame_time: f32,
    /// Frames in playback order
    pub frames: Vec<AnimationFrameDescription>,
}

/// Component attached to a scene node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentDescription {
    /// [`Transform2DComponent`]
    Transform2D(Transform2DComponent),
    /// [`SpriteComponent`]; the texture is loaded on demand
    Sprite {
        /// Texture file
        texture_path: String,
        /// Region of the texture
        draw_source: Rect2,
        /// Mirror horizontally
        #[serde(default)]
        flip_x: bool,
        /// Mirror vertically
        #[serde(default)]
        flip_y: bool,
        /// Tint
        #[serde(default)]
        modulate: Color,
    },
    /// [`AnimatedSpriteComponent`]; frame textures are loaded on demand
    AnimatedSprite {
        /// Available animations
        animations: Vec<AnimationDescription>,
        /// Animation shown first; must be one of `animations`
        current_animation: String,
        /// Start playing right away
        #[serde(default)]
        is_playing: bool,
        /// Mirror horizontally
        #[serde(default)]
        flip_x: bool,
        /// Mirror vertically
        #[serde(default)]
        flip_y: bool,
        /// Tint
        #[serde(default)]
        modulate: Color,
    },
    /// [`TextLabelComponent`]
    TextLabel {
        /// Text to draw
        text: String,
        /// Font identifier
        font_uid: String,
        /// Text color
        #[serde(default)]
        color: Color,
    },
    /// [`ColliderComponent`]
    Collider {
        /// Offset and size
        rect: Rect2,
        /// Debug color
        #[serde(default)]
        color: Option<Color>,
    },
}

/// One node of a scene description
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeDescription {
    /// Requested name; bumped when a sibling already uses it
    pub name: String,
    /// Scene tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the node is drawn
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Components to attach
    #[serde(default)]
    pub components: Vec<ComponentDescription>,
    /// Child nodes
    #[serde(default)]
    pub children: Vec<NodeDescription>,
}

const fn default_visible() -> bool {
    true
}

impl NodeDescription {
    /// Visible node without components
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            ..Self::default()
        }
    }

    /// Builder pattern: set the tags
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|tag| (*tag).to_string()).collect();
        self
    }

    /// Builder pattern: add a component
    pub fn with_component(mut self, component: ComponentDescription) -> Self {
        self.components.push(component);
        self
    }

    /// Builder pattern: add a child node
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Whole scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Fonts loaded before any node is created
    #[serde(default)]
    pub fonts: Vec<FontDescription>,
    /// Root node
    pub root: NodeDescription,
}

impl SceneDescription {
    /// Scene made of `root` and its children
    pub fn new(root: NodeDescription) -> Self {
        Self {
            fonts: Vec::new(),
            root,
        }
    }

    /// Builder pattern: declare a font
    pub fn with_font(mut self, uid: &str, path: &str, size: u32) -> Self {
        self.fonts.push(FontDescription {
            uid: uid.to_string(),
            path: path.to_string(),
            size,
        });
        self
    }

    /// Parse a RON scene description
    pub fn from_ron(path: &str, contents: &str) -> Result<Self, SceneLoadError> {
        ron::from_str(contents).map_err(|e| SceneLoadError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize as pretty RON
    pub fn to_ron(&self) -> Result<String, SceneLoadError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).map_err(|e| {
            SceneLoadError::Parse {
                path: self.root.name.clone(),
                message: e.to_string(),
            }
        })
    }

    /// Create the scene's entities in `world` and return its graph
    ///
    /// Fonts and starting animations are checked before any entity is
    /// created, so a failed instantiation leaves the world untouched.
    pub fn instantiate(
        &self,
        world: &mut World,
        assets: &mut AssetCache,
    ) -> Result<SceneGraph, SceneLoadError> {
        for font in &self.fonts {
            if assets.font(&font.uid).is_none() {
                assets.load_font(&font.uid, &font.path, font.size);
            }
        }
        self.check_references(assets)?;

        let mut scene = SceneGraph::new();
        instantiate_node(&self.root, self.root.name.clone(), None, &mut scene, world, assets);
        log::debug!("Instantiated scene with {} node(s)", scene.len());
        Ok(scene)
    }

    fn check_references(&self, assets: &AssetCache) -> Result<(), SceneLoadError> {
        let mut missing = None;
        self.root.walk(&mut |node| {
            for component in &node.components {
                if missing.is_some() {
                    return;
                }
                match component {
                    ComponentDescription::TextLabel { font_uid, .. } if assets.font(font_uid).is_none() => {
                        missing = Some(SceneLoadError::UnknownFont {
                            node: node.name.clone(),
                            font_uid: font_uid.clone(),
                        });
                    }
                    ComponentDescription::AnimatedSprite {
                        animations,
                        current_animation,
                        ..
                    } if !animations.iter().any(|animation| animation.name == *current_animation) => {
                        missing = Some(SceneLoadError::UnknownAnimation {
                            node: node.name.clone(),
                            animation: current_animation.clone(),
                        });
                    }
                    _ => {}
                }
            }
        });
        missing.map_or(Ok(()), Err)
    }
}

fn instantiate_node(
    node: &NodeDescription,
    name: String,
    parent: Option<Entity>,
    scene: &mut SceneGraph,
    world: &mut World,
    assets: &mut AssetCache,
) -> Entity {
    let entity = world.create_entity();
    world.load_component(
        entity,
        SceneComponent::new(name)
            .with_tags(node.tags.iter().cloned())
            .with_visible(node.visible),
    );
    for component in &node.components {
        load_component(entity, component, world, assets);
    }

    match parent {
        Some(parent) => scene.add_child_node(entity, parent),
        None => scene.add_root_node(entity),
    }

    let mut sibling_names = HashSet::new();
    for child in &node.children {
        let child_name = unique_sibling_name(&child.name, &sibling_names);
        sibling_names.insert(child_name.clone());
        instantiate_node(child, child_name, Some(entity), scene, world, assets);
    }
    entity
}

fn load_component(
    entity: Entity,
    component: &ComponentDescription,
    world: &mut World,
    assets: &mut AssetCache,
) {
    match component {
        ComponentDescription::Transform2D(transform) => world.load_component(entity, *transform),
        ComponentDescription::Sprite {
            texture_path,
            draw_source,
            flip_x,
            flip_y,
            modulate,
        } => {
            let texture = assets
                .texture(texture_path)
                .unwrap_or_else(|| assets.load_texture(texture_path));
            world.load_component(
                entity,
                SpriteComponent::new(texture, *draw_source)
                    .with_flip(*flip_x, *flip_y)
                    .with_modulate(*modulate),
            );
        }
        ComponentDescription::AnimatedSprite {
            animations,
            current_animation,
            is_playing,
            flip_x,
            flip_y,
            modulate,
        } => {
            let animations: Vec<Animation> = animations
                .iter()
                .map(|animation| {
                    let frames = animation
                        .frames
                        .iter()
                        .map(|frame| {
                            let texture = assets
                                .texture(&frame.texture_path)
                                .unwrap_or_else(|| assets.load_texture(&frame.texture_path));
                            AnimationFrame::new(texture, frame.draw_source)
                        })
                        .collect();
                    Animation::new(animation.name.clone(), animation.frame_time, frames)
                })
                .collect();
            // Starting animation checked before instantiation started
            let mut sprite = AnimatedSpriteComponent::new(animations, current_animation)
                .with_flip(*flip_x, *flip_y)
                .with_modulate(*modulate);
            sprite.is_playing = *is_playing;
            world.load_component(entity, sprite);
        }
        ComponentDescription::TextLabel { text, font_uid, color } => {
            // Checked before instantiation started
            let font = assets.font(font_uid);
            world.load_component(
                entity,
                TextLabelComponent {
                    text: text.clone(),
                    font,
                    color: *color,
                },
            );
        }
        ComponentDescription::Collider { rect, color } => {
            let mut collider = ColliderComponent::new(*rect);
            if let Some(color) = color {
                collider.color = *color;
            }
            world.load_component(entity, collider);
        }
    }
}

/// `name`, or `name` with its trailing number bumped until no sibling uses it
///
/// `Enemy` becomes `Enemy2`, `Enemy2` becomes `Enemy3`.
pub fn unique_sibling_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
    let mut number = name[stem.len()..].parse::<u32>().map_or(2, |n| n + 1);
    loop {
        let candidate = format!("{stem}{number}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        number += 1;
    }
}

/// Source of scene descriptions
pub trait SceneLoader {
    /// Description of the scene at `path`
    fn description(&self, path: &str) -> Result<SceneDescription, SceneLoadError>;

    /// Build the scene at `path` inside `world`
    fn load_scene(
        &self,
        path: &str,
        world: &mut World,
        assets: &mut AssetCache,
    ) -> Result<SceneGraph, SceneLoadError> {
        log::info!("Loading scene '{path}'");
        self.description(path)?.instantiate(world, assets)
    }
}

/// Loads RON scene files relative to a base directory
#[derive(Debug, Clone, Default)]
pub struct RonSceneLoader {
    base_dir: PathBuf,
}

impl RonSceneLoader {
    /// Loader resolving scene paths against `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl SceneLoader for RonSceneLoader {
    fn description(&self, path: &str) -> Result<SceneDescription, SceneLoadError> {
        let full_path = self.base_dir.join(path);
        let contents = std::fs::read_to_string(&full_path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SceneLoadError::NotFound(full_path.display().to_string())
            } else {
                SceneLoadError::Io {
                    path: full_path.display().to_string(),
                    source,
                }
            }
        })?;
        SceneDescription::from_ron(path, &contents)
    }
}

/// Serves scene descriptions registered in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySceneLoader {
    scenes: HashMap<String, SceneDescription>,
}

impl MemorySceneLoader {
    /// Create an empty loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: serve `description` under `path`
    pub fn with_scene(mut self, path: impl Into<String>, description: SceneDescription) -> Self {
        self.insert(path, description);
        self
    }

    /// Serve `description` under `path`
    pub fn insert(&mut self, path: impl Into<String>, description: SceneDescription) {
        self.scenes.insert(path.into(), description);
    }
}

impl SceneLoader for MemorySceneLoader {
    fn description(&self, path: &str) -> Result<SceneDescription, SceneLoadError> {
        self.scenes
            .get(path)
            .cloned()
            .ok_or_else(|| SceneLoadError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;

    fn taken(names: &[&str]) -> HashSet<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    fn sample_scene() -> SceneDescription {
        SceneDescription::new(
            NodeDescription::new("Main")
                .with_component(ComponentDescription::Transform2D(Transform2DComponent::default()))
                .with_child(
                    NodeDescription::new("Enemy")
                        .with_tags(&["enemy"])
                        .with_component(ComponentDescription::Transform2D(
                            Transform2DComponent::at(Vec2::new(4.0, 2.0)),
                        ))
                        .with_component(ComponentDescription::Collider {
                            rect: Rect2::new(0.0, 0.0, 8.0, 8.0),
                            color: None,
                        }),
                )
                .with_child(NodeDescription::new("Enemy").with_tags(&["enemy"]))
                .with_child(
                    NodeDescription::new("Title").with_component(ComponentDescription::TextLabel {
                        text: "Hello".into(),
                        font_uid: "default".into(),
                        color: Color::WHITE,
                    }),
                ),
        )
        .with_font("default", "fonts/verdana.ttf", 16)
    }

    #[test]
    fn test_unique_sibling_names() {
        assert_eq!(unique_sibling_name("Enemy", &taken(&[])), "Enemy");
        assert_eq!(unique_sibling_name("Enemy", &taken(&["Enemy"])), "Enemy2");
        assert_eq!(unique_sibling_name("Enemy", &taken(&["Enemy", "Enemy2"])), "Enemy3");
        assert_eq!(unique_sibling_name("Enemy2", &taken(&["Enemy2"])), "Enemy3");
    }

    #[test]
    fn test_instantiate_builds_tree_without_notifying() {
        let mut world = World::new();
        let mut assets = AssetCache::new();

        let scene = sample_scene().instantiate(&mut world, &mut assets).unwrap();
        assert_eq!(scene.len(), 4);
        assert_eq!(world.alive_entities(), 4);

        let root = scene.root().unwrap();
        let names: Vec<String> = scene
            .children_of(root)
            .iter()
            .map(|&child| world.get_component::<SceneComponent>(child).name.clone())
            .collect();
        assert_eq!(names, vec!["Enemy", "Enemy2", "Title"]);

        let enemy = scene.children_of(root)[0];
        assert!(world.has_component::<ColliderComponent>(enemy));
        assert!(world.is_component_enabled::<ColliderComponent>(enemy));
        assert_eq!(assets.font_count(), 1);
    }

    #[test]
    fn test_unknown_font_fails_before_creating_entities() {
        let mut world = World::new();
        let mut assets = AssetCache::new();
        let mut description = sample_scene();
        description.fonts.clear();

        let result = description.instantiate(&mut world, &mut assets);
        assert!(matches!(result, Err(SceneLoadError::UnknownFont { .. })));
        assert_eq!(world.alive_entities(), 0);
    }

    fn animated_node(current_animation: &str) -> NodeDescription {
        let frame = |x: f32| AnimationFrameDescription {
            texture_path: "player.png".into(),
            draw_source: Rect2::new(x, 0.0, 16.0, 16.0),
        };
        NodeDescription::new("Player").with_component(ComponentDescription::AnimatedSprite {
            animations: vec![
                AnimationDescription {
                    name: "idle".into(),
                    frame_time: 0.5,
                    frames: vec![frame(0.0)],
                },
                AnimationDescription {
                    name: "walk".into(),
                    frame_time: 0.1,
                    frames: vec![frame(16.0), frame(32.0)],
                },
            ],
            current_animation: current_animation.into(),
            is_playing: true,
            flip_x: true,
            flip_y: false,
            modulate: Color::WHITE,
        })
    }

    #[test]
    fn test_instantiate_animated_sprite() {
        let mut world = World::new();
        let mut assets = AssetCache::new();
        let description = SceneDescription::new(animated_node("walk"));
        let ron = description.to_ron().unwrap();
        assert_eq!(SceneDescription::from_ron("player.ron", &ron).unwrap(), description);

        let scene = description.instantiate(&mut world, &mut assets).unwrap();
        let player = scene.root().unwrap();
        let sprite = world.get_component::<AnimatedSpriteComponent>(player);
        assert_eq!(sprite.current_animation_name(), "walk");
        assert!(sprite.is_playing);
        assert!(sprite.flip_x);
        assert!(sprite.has_animation("idle"));
        assert_eq!(sprite.current_frame().unwrap().draw_source, Rect2::new(16.0, 0.0, 16.0, 16.0));
        // Frames sharing a file share one texture
        assert_eq!(assets.texture_count(), 1);
    }

    #[test]
    fn test_undefined_starting_animation_fails_before_creating_entities() {
        let mut world = World::new();
        let mut assets = AssetCache::new();
        let description = SceneDescription::new(
            NodeDescription::new("Main").with_child(animated_node("run")),
        );

        let result = description.instantiate(&mut world, &mut assets);
        assert!(matches!(
            result,
            Err(SceneLoadError::UnknownAnimation { ref node, ref animation })
                if node == "Player" && animation == "run"
        ));
        assert_eq!(world.alive_entities(), 0);
    }

    #[test]
    fn test_memory_loader_reports_missing_scene() {
        let loader = MemorySceneLoader::new().with_scene("main.ron", sample_scene());
        assert!(loader.description("main.ron").is_ok());
        assert!(matches!(
            loader.description("other.ron"),
            Err(SceneLoadError::NotFound(_))
        ));
    }

    #[test]
    fn test_ron_loader_reads_scene_file() {
        let dir = std::env::temp_dir().join(format!("red_engine_scene_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("level.ron"), sample_scene().to_ron().unwrap()).unwrap();

        let loader = RonSceneLoader::new(dir.clone());
        let description = loader.description("level.ron").unwrap();
        assert_eq!(description, sample_scene());
        assert!(matches!(
            loader.description("missing.ron"),
            Err(SceneLoadError::NotFound(_))
        ));

        std::fs::remove_dir_all(&dir).ok();
    }
}
