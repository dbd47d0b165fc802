//! Scene membership component

use crate::ecs::Component;

/// Name, tags and visibility of an entity that lives in the scene graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneComponent {
    /// Name, unique among siblings when created by the scene loader
    pub name: String,
    /// Free-form tags; tag-indexed systems keep lookups for them
    pub tags: Vec<String>,
    /// Rendering systems skip invisible entities
    pub visible: bool,
}

impl Component for SceneComponent {}

impl Default for SceneComponent {
    fn default() -> Self {
        Self {
            name: String::new(),
            tags: Vec::new(),
            visible: true,
        }
    }
}

impl SceneComponent {
    /// Visible, untagged component named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder pattern: set the tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Builder pattern: set visibility
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Whether `tag` is among the tags
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
