//! System trait and dispatch context
//!
//! A system is a behavior unit that is handed the set of entities whose
//! enabled signature contains its required signature. The registry calls the
//! hook methods below only for the lifecycle lists the system joined at
//! registration (see [`SystemHooks`]).

use std::any::Any;
use std::collections::{BTreeSet, HashMap};

use bitflags::bitflags;

use super::entity::Entity;
use super::storage::ComponentStore;
use super::Component;
use crate::ecs::components::Transform2DComponent;
use crate::render::{DrawCommand, RenderQueue};
use crate::scene::{transform, Camera2D, SceneGraph};

bitflags! {
    /// Dispatch lists a system joins
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SystemHooks: u32 {
        /// Variable-step [`System::on_update`]
        const UPDATE = 1 << 0;
        /// Fixed-step [`System::on_physics_update`]
        const PHYSICS_UPDATE = 1 << 1;
        /// [`System::on_render`]
        const RENDER = 1 << 2;
        /// [`System::on_scene_start`]
        const SCENE_START = 1 << 3;
        /// [`System::on_scene_end`]
        const SCENE_END = 1 << 4;
        /// Tag callbacks; marks the system as keeping a tag index
        const TAG_CHANGED = 1 << 5;
    }
}

impl SystemHooks {
    /// Join no dispatch list
    pub const NONE: Self = Self::empty();
}

/// Behavior unit driven by the engine loop
///
/// All hooks default to no-ops so a system only implements what it joined.
pub trait System: 'static {
    /// Variable time step update
    fn on_update(&mut self, _ctx: &mut SystemContext<'_>, _delta_time: f32) {}

    /// Fixed time step update
    fn on_physics_update(&mut self, _ctx: &mut SystemContext<'_>, _delta_time: f32) {}

    /// Submit draw commands
    fn on_render(&mut self, _ctx: &mut SystemContext<'_>) {}

    /// A new scene became current and every node was registered
    fn on_scene_start(&mut self, _ctx: &mut SystemContext<'_>) {}

    /// The current scene is about to be torn down
    fn on_scene_end(&mut self, _ctx: &mut SystemContext<'_>) {}

    /// A matched entity's scene tags were set or changed
    fn on_entity_tags_updated(&mut self, _entity: Entity, _old_tags: &[String], _new_tags: &[String]) {}

    /// A previously matched entity stopped matching or was destroyed
    fn on_entity_tags_removed(&mut self, _entity: Entity, _tags: &[String]) {}
}

/// Object-safe downcasting for boxed systems
pub(crate) trait AnySystem: System {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: System> AnySystem for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Structural changes requested while systems are running
///
/// Applied by the orchestrator at the next flush point, never mid-dispatch.
#[derive(Debug, Default)]
pub struct FrameRequests {
    pub(crate) destroy: Vec<Entity>,
    pub(crate) scene_change: Option<String>,
}

impl FrameRequests {
    /// Whether nothing was requested
    pub fn is_empty(&self) -> bool {
        self.destroy.is_empty() && self.scene_change.is_none()
    }

    /// Entities waiting for destruction, in queue order
    pub fn queued_destruction(&self) -> &[Entity] {
        &self.destroy
    }

    pub(crate) fn queue_destroy(&mut self, entity: Entity) {
        if self.destroy.contains(&entity) {
            log::warn!("Entity '{}' is already queued for destruction!", entity.id());
            return;
        }
        self.destroy.push(entity);
    }
}

/// Shared world state handed to the orchestrator's dispatch loop
pub(crate) struct DispatchEnv<'a> {
    pub components: &'a mut ComponentStore,
    pub scene: &'a SceneGraph,
    pub camera: &'a Camera2D,
    pub render_queue: &'a mut RenderQueue,
    pub requests: &'a mut FrameRequests,
}

/// Everything a system may touch while one of its hooks runs
pub struct SystemContext<'a> {
    /// Component data; read, mutate and write back freely
    pub components: &'a mut ComponentStore,
    /// Current scene topology
    pub scene: &'a SceneGraph,
    /// Active 2D camera
    pub camera: &'a Camera2D,
    entities: &'a BTreeSet<Entity>,
    render_queue: &'a mut RenderQueue,
    requests: &'a mut FrameRequests,
}

impl<'a> SystemContext<'a> {
    pub(crate) fn new(env: &'a mut DispatchEnv<'_>, entities: &'a BTreeSet<Entity>) -> Self {
        Self {
            components: &mut *env.components,
            scene: env.scene,
            camera: env.camera,
            entities,
            render_queue: &mut *env.render_queue,
            requests: &mut *env.requests,
        }
    }

    /// Entities this system currently matches, in ascending ID order
    pub fn entities(&self) -> &BTreeSet<Entity> {
        self.entities
    }

    /// Snapshot of the matched entities for loops that also borrow components
    pub fn entity_list(&self) -> Vec<Entity> {
        self.entities.iter().copied().collect()
    }

    /// Shorthand for `self.components.get`
    pub fn component<T: Component>(&self, entity: Entity) -> &T {
        self.components.get::<T>(entity)
    }

    /// World-space transform composed from the scene ancestors
    pub fn world_transform(&self, entity: Entity) -> Transform2DComponent {
        transform::compose_world_transform(self.scene, self.components, entity)
    }

    /// World transform with the camera applied unless the entity ignores it
    pub fn screen_transform(&self, entity: Entity) -> Transform2DComponent {
        transform::translate_entity_transform(self.scene, self.components, self.camera, entity)
    }

    /// Queue a draw command for this frame
    pub fn submit(&mut self, command: DrawCommand) {
        self.render_queue.submit(command);
    }

    /// Destroy the entity at the end of the frame
    pub fn queue_destroy_entity(&mut self, entity: Entity) {
        self.requests.queue_destroy(entity);
    }

    /// Switch scenes at the next frame boundary
    pub fn prepare_scene_change(&mut self, path: impl Into<String>) {
        self.requests.scene_change = Some(path.into());
    }
}

/// Tag → entity index maintained from the tag callbacks
#[derive(Debug, Default, Clone)]
pub struct TagIndex {
    entities_by_tag: HashMap<String, BTreeSet<Entity>>,
}

impl TagIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Move an entity from its old tags to its new ones
    pub fn update(&mut self, entity: Entity, old_tags: &[String], new_tags: &[String]) {
        self.remove(entity, old_tags);
        for tag in new_tags {
            self.entities_by_tag
                .entry(tag.clone())
                .or_default()
                .insert(entity);
        }
    }

    /// Drop an entity from the given tags
    pub fn remove(&mut self, entity: Entity, tags: &[String]) {
        for tag in tags {
            if let Some(entities) = self.entities_by_tag.get_mut(tag) {
                entities.remove(&entity);
                if entities.is_empty() {
                    self.entities_by_tag.remove(tag);
                }
            }
        }
    }

    /// Entities carrying `tag`
    pub fn tagged(&self, tag: &str) -> impl Iterator<Item = Entity> + '_ {
        self.entities_by_tag
            .get(tag)
            .into_iter()
            .flat_map(|entities| entities.iter().copied())
    }

    /// Whether the entity carries `tag`
    pub fn has_tag(&self, entity: Entity, tag: &str) -> bool {
        self.entities_by_tag
            .get(tag)
            .is_some_and(|entities| entities.contains(&entity))
    }

    /// Number of distinct tags in use
    pub fn tag_count(&self) -> usize {
        self.entities_by_tag.len()
    }
}
