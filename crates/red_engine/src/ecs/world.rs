//! ECS World implementation
//!
//! [`World`] owns the entity registry, component store, system registry,
//! current scene, camera and render queue, and keeps them consistent:
//! every structural change (component attached, removed, enabled or disabled,
//! entity added to the scene, tags changed) recomputes the entity's signature
//! and tells the systems about it.
//!
//! Destruction and scene changes are deferred. Entities are queued with
//! [`World::queue_destroy_entity`] and torn down together by
//! [`World::destroy_queued_entities`]; a scene change is prepared with
//! [`World::prepare_scene_change`] and carried out at the next frame boundary.

use std::any::TypeId;
use std::collections::BTreeSet;

use super::components::{
    AnimatedSpriteComponent, ColliderComponent, SceneComponent, SpriteComponent, TextLabelComponent, Transform2DComponent,
};
use super::entity::EntityRegistry;
use super::registry::SystemRegistry;
use super::signature::{ComponentSignature, ComponentType};
use super::storage::ComponentStore;
use super::system::{DispatchEnv, FrameRequests, SystemHooks};
use super::{Component, Entity, System};
use crate::assets::AssetCache;
use crate::config::EngineConfig;
use crate::render::{DrawCommand, RenderQueue};
use crate::scene::loader::{SceneLoadError, SceneLoader};
use crate::scene::{transform, Camera2D, SceneGraph};

/// ECS World containing all entities, components and systems
pub struct World {
    entities: EntityRegistry,
    components: ComponentStore,
    systems: SystemRegistry,
    scene: SceneGraph,
    camera: Camera2D,
    render_queue: RenderQueue,
    requests: FrameRequests,
    scene_to_change: Option<String>,
    scene_to_destroy: bool,
    current_scene_path: Option<String>,
}

impl World {
    /// Create a new world with the default entity cap
    pub fn new() -> Self {
        Self::with_max_entities(EngineConfig::default().max_entities)
    }

    /// Create a new world from engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_max_entities(config.max_entities)
    }

    /// Create a new world allowing at most `max_entities` live entities
    ///
    /// The built-in components are registered right away.
    pub fn with_max_entities(max_entities: usize) -> Self {
        let mut world = Self {
            entities: EntityRegistry::new(max_entities),
            components: ComponentStore::new(),
            systems: SystemRegistry::new(),
            scene: SceneGraph::new(),
            camera: Camera2D::default(),
            render_queue: RenderQueue::new(),
            requests: FrameRequests::default(),
            scene_to_change: None,
            scene_to_destroy: false,
            current_scene_path: None,
        };
        world.register_component::<Transform2DComponent>();
        world.register_component::<SpriteComponent>();
        world.register_component::<TextLabelComponent>();
        world.register_component::<ColliderComponent>();
        world.register_component::<SceneComponent>();
        world.register_component::<AnimatedSpriteComponent>();
        world
    }

    // --- Entities ---

    /// Create a new entity
    pub fn create_entity(&mut self) -> Entity {
        self.entities.create_entity()
    }

    /// Whether the entity exists and is not destroyed
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of live entities
    pub fn alive_entities(&self) -> usize {
        self.entities.alive_entities()
    }

    /// Raw signature of an entity
    pub fn entity_signature(&self, entity: Entity) -> ComponentSignature {
        self.entities.signature(entity)
    }

    /// Enabled signature of an entity
    pub fn entity_enabled_signature(&self, entity: Entity) -> ComponentSignature {
        self.entities.enabled_signature(entity)
    }

    /// Destroy the entity (and its scene subtree) at the next flush
    ///
    /// Queueing an entity twice only logs a warning.
    pub fn queue_destroy_entity(&mut self, entity: Entity) {
        self.requests.queue_destroy(entity);
    }

    /// Entities waiting for [`Self::destroy_queued_entities`]
    pub fn queued_for_destruction(&self) -> &[Entity] {
        self.requests.queued_destruction()
    }

    /// Tear down every queued entity
    ///
    /// Each queued entity's scene subtree is removed, every removed entity is
    /// destroyed, the registry is finalized, and finally systems and component
    /// arrays forget them. Returns the destroyed entities.
    pub fn destroy_queued_entities(&mut self) -> Vec<Entity> {
        let queued = std::mem::take(&mut self.requests.destroy);
        if queued.is_empty() {
            return Vec::new();
        }

        let mut destroyed = Vec::new();
        for entity in queued {
            let removed = if self.scene.is_node_in_scene(entity) {
                self.scene.delete_node(entity)
            } else {
                vec![entity]
            };
            for removed_entity in removed {
                if !self.entities.is_alive(removed_entity) {
                    log::debug!("Entity '{}' is already destroyed; skipping", removed_entity.id());
                    continue;
                }
                // Tags are read before the components go away
                let tags = self.entity_tags(removed_entity);
                self.entities.destroy_entity(removed_entity);
                destroyed.push((removed_entity, tags));
            }
        }

        self.entities.finalize_queued_deletions();
        for (entity, tags) in &destroyed {
            self.systems.entity_destroyed(*entity, tags);
            self.components.entity_destroyed(*entity);
        }
        log::debug!("Destroyed {} queued entity(ies)", destroyed.len());

        destroyed.into_iter().map(|(entity, _)| entity).collect()
    }

    // --- Components ---

    /// Register a component type
    ///
    /// # Panics
    /// If `T` is already registered or the component type limit is reached.
    pub fn register_component<T: Component>(&mut self) -> ComponentType {
        self.components.register::<T>()
    }

    /// Component type index of `T`
    pub fn component_type<T: Component>(&self) -> ComponentType {
        self.components.component_type::<T>()
    }

    /// Component storage
    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    /// Component storage, mutable
    ///
    /// Values may be read and written freely; attaching or detaching through
    /// the store directly skips signature bookkeeping.
    pub fn components_mut(&mut self) -> &mut ComponentStore {
        &mut self.components
    }

    /// Attach a component and notify systems
    ///
    /// # Panics
    /// If `T` is unregistered or already attached.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) {
        self.load_component(entity, component);
        self.notify_signature_changed(entity);
    }

    /// Attach a component without notifying systems
    ///
    /// Used while building a scene; systems are told about every node once
    /// the scene becomes current.
    pub(crate) fn load_component<T: Component>(&mut self, entity: Entity, component: T) {
        self.components.add(entity, component);
        let component_type = self.components.component_type::<T>();

        let mut signature = self.entities.signature(entity);
        signature.set(component_type, true);
        self.entities.set_signature(entity, signature);

        let mut enabled = self.entities.enabled_signature(entity);
        enabled.set(component_type, true);
        self.entities.set_enabled_signature(entity, enabled);
    }

    /// Detach a component, notify systems and return the value
    ///
    /// Systems are notified once the value is gone, so removing a
    /// [`SceneComponent`] also clears the entity's tags from tag indices.
    ///
    /// # Panics
    /// If the entity has no `T`.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> T {
        let component_type = self.components.component_type::<T>();
        let mut signature = self.entities.signature(entity);
        signature.set(component_type, false);
        // Clearing the raw bit clears the enabled bit as well
        self.entities.set_signature(entity, signature);
        let component = self.components.remove::<T>(entity);
        self.notify_signature_changed(entity);
        component
    }

    /// Make an attached component count for system matching again
    ///
    /// # Panics
    /// If the entity has no `T`.
    pub fn enable_component<T: Component>(&mut self, entity: Entity) {
        let component_type = self.components.component_type::<T>();
        assert!(
            self.entities.signature(entity).contains(component_type),
            "Cannot enable component '{}' that is not attached to entity '{}'!",
            std::any::type_name::<T>(),
            entity.id()
        );
        let mut enabled = self.entities.enabled_signature(entity);
        enabled.set(component_type, true);
        self.entities.set_enabled_signature(entity, enabled);
        self.notify_signature_changed(entity);
    }

    /// Keep the component attached but hide it from system matching
    pub fn disable_component<T: Component>(&mut self, entity: Entity) {
        let component_type = self.components.component_type::<T>();
        let mut enabled = self.entities.enabled_signature(entity);
        enabled.set(component_type, false);
        self.entities.set_enabled_signature(entity, enabled);
        self.notify_signature_changed(entity);
    }

    /// Whether `T` is attached and enabled
    pub fn is_component_enabled<T: Component>(&self, entity: Entity) -> bool {
        let component_type = self.components.component_type::<T>();
        self.entities.enabled_signature(entity).contains(component_type)
    }

    /// Whether `T` is attached, enabled or not
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.components.has::<T>(entity)
    }

    /// Shared access to a component
    ///
    /// # Panics
    /// If the entity has no `T`.
    pub fn get_component<T: Component>(&self, entity: Entity) -> &T {
        self.components.get::<T>(entity)
    }

    /// Exclusive access to a component
    ///
    /// # Panics
    /// If the entity has no `T`.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        self.components.get_mut::<T>(entity)
    }

    /// Shared access to a component, `None` when absent
    pub fn try_get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.components.try_get::<T>(entity)
    }

    /// Overwrite an attached component
    ///
    /// Writing back a [`SceneComponent`] reports its tags to tag-indexed
    /// systems, the same as [`Self::set_entity_tags`].
    pub fn update_component<T: Component>(&mut self, entity: Entity, component: T) {
        let is_scene_component = TypeId::of::<T>() == TypeId::of::<SceneComponent>();
        let old_tags = if is_scene_component {
            self.entity_tags(entity)
        } else {
            Vec::new()
        };
        self.components.update(entity, component);
        if is_scene_component {
            let new_tags = self.entity_tags(entity);
            self.systems.entity_tags_changed(entity, &old_tags, &new_tags);
        }
    }

    /// Replace an entity's scene tags and notify tag-indexed systems
    ///
    /// Tags edited in place through [`Self::get_component_mut`] reach the
    /// systems at the entity's next signature change.
    ///
    /// # Panics
    /// If the entity has no [`SceneComponent`].
    pub fn set_entity_tags<I, S>(&mut self, entity: Entity, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let new_tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        let scene_component = self.components.get_mut::<SceneComponent>(entity);
        let old_tags = std::mem::replace(&mut scene_component.tags, new_tags.clone());
        self.systems.entity_tags_changed(entity, &old_tags, &new_tags);
    }

    fn entity_tags(&self, entity: Entity) -> Vec<String> {
        self.components
            .try_get::<SceneComponent>(entity)
            .map(|scene_component| scene_component.tags.clone())
            .unwrap_or_default()
    }

    fn notify_signature_changed(&mut self, entity: Entity) {
        let enabled = self.entities.enabled_signature(entity);
        let tags = self.entity_tags(entity);
        self.systems.entity_signature_changed(entity, enabled, &tags);
    }

    // --- Systems ---

    /// Register a system that matches entities containing `signature`
    ///
    /// Entities that already exist are matched right away.
    ///
    /// # Panics
    /// If a system of the same type is already registered.
    pub fn register_system<T: System>(
        &mut self,
        system: T,
        signature: ComponentSignature,
        hooks: SystemHooks,
    ) -> &mut T {
        self.systems.register(system, hooks);
        self.systems.set_signature::<T>(signature);

        let existing: Vec<Entity> = self.entities.iter_alive().collect();
        for entity in existing {
            let enabled = self.entities.enabled_signature(entity);
            let tags = self.entity_tags(entity);
            self.systems.entity_signature_changed_for::<T>(entity, enabled, &tags);
        }
        self.systems.get_mut::<T>()
    }

    /// Whether a system of type `T` is registered
    pub fn has_system<T: System>(&self) -> bool {
        self.systems.has::<T>()
    }

    /// Shared access to a system
    pub fn get_system<T: System>(&self) -> &T {
        self.systems.get::<T>()
    }

    /// Exclusive access to a system
    pub fn get_system_mut<T: System>(&mut self) -> &mut T {
        self.systems.get_mut::<T>()
    }

    /// Entities currently matched by `T`
    pub fn system_entities<T: System>(&self) -> &BTreeSet<Entity> {
        self.systems.entities::<T>()
    }

    /// Resume hook dispatch to `T`
    pub fn enable_system<T: System>(&mut self) {
        self.systems.enable::<T>();
    }

    /// Pause hook dispatch to `T`
    pub fn disable_system<T: System>(&mut self) {
        self.systems.disable::<T>();
    }

    /// System registry
    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    /// Run every `UPDATE` system
    pub fn update_systems(&mut self, delta_time: f32) {
        self.dispatch(|systems, env| systems.update_systems(env, delta_time));
    }

    /// Run every `PHYSICS_UPDATE` system
    pub fn physics_update_systems(&mut self, delta_time: f32) {
        self.dispatch(|systems, env| systems.physics_update_systems(env, delta_time));
    }

    /// Run every `RENDER` system
    pub fn render_systems(&mut self) {
        self.dispatch(SystemRegistry::render_systems);
    }

    /// Run every `SCENE_START` system
    pub fn on_scene_start_systems(&mut self) {
        self.dispatch(SystemRegistry::on_scene_start_systems);
    }

    /// Run every `SCENE_END` system
    pub fn on_scene_end_systems(&mut self) {
        self.dispatch(SystemRegistry::on_scene_end_systems);
    }

    /// Drain the render queue in draw order
    pub fn take_draw_commands(&mut self) -> Vec<DrawCommand> {
        self.render_queue.flush()
    }

    fn dispatch<F>(&mut self, run: F)
    where
        F: FnOnce(&mut SystemRegistry, &mut DispatchEnv<'_>),
    {
        let mut env = DispatchEnv {
            components: &mut self.components,
            scene: &self.scene,
            camera: &self.camera,
            render_queue: &mut self.render_queue,
            requests: &mut self.requests,
        };
        run(&mut self.systems, &mut env);

        if let Some(path) = self.requests.scene_change.take() {
            self.prepare_scene_change(path);
        }
    }

    // --- Scene ---

    /// Current scene graph
    pub fn current_scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Path of the scene loaded last
    pub fn current_scene_path(&self) -> Option<&str> {
        self.current_scene_path.as_deref()
    }

    /// Make `entity` the scene root and notify systems
    pub fn add_root_node(&mut self, entity: Entity) {
        self.scene.add_root_node(entity);
        self.notify_signature_changed(entity);
    }

    /// Attach `child` under `parent` and notify systems
    ///
    /// # Panics
    /// If `parent` is not in the scene or `child` already is.
    pub fn add_child_node(&mut self, child: Entity, parent: Entity) {
        self.scene.add_child_node(child, parent);
        self.notify_signature_changed(child);
    }

    /// Load the scene at `path` at the next frame boundary
    ///
    /// If a scene is current it is torn down first.
    pub fn prepare_scene_change(&mut self, path: impl Into<String>) {
        let path = path.into();
        log::info!("Preparing change to scene '{path}'");
        self.scene_to_change = Some(path);
        if self.scene.root().is_some() {
            self.scene_to_destroy = true;
        }
    }

    /// Whether the current scene is waiting to be torn down
    pub fn has_scene_to_destroy(&self) -> bool {
        self.scene_to_destroy
    }

    /// Whether a new scene is waiting to be loaded
    pub fn has_scene_to_create(&self) -> bool {
        self.scene_to_change.is_some() && !self.scene_to_destroy
    }

    /// End the current scene and queue all of its entities for destruction
    pub fn destroy_scene(&mut self) {
        self.on_scene_end_systems();
        for entity in self.scene.walk() {
            if !self.requests.destroy.contains(&entity) {
                self.requests.destroy.push(entity);
            }
        }
        self.scene_to_destroy = false;
    }

    /// Load the pending scene and make it current
    ///
    /// Every node of the new scene is reported to the systems, then
    /// `SCENE_START` systems run exactly once.
    pub fn change_to_scene(
        &mut self,
        loader: &dyn SceneLoader,
        assets: &mut AssetCache,
    ) -> Result<(), SceneLoadError> {
        let Some(path) = self.scene_to_change.take() else {
            log::warn!("No scene change was prepared!");
            return Ok(());
        };

        let scene = loader.load_scene(&path, self, assets)?;
        let previous = std::mem::replace(&mut self.scene, scene);
        if !previous.is_empty() {
            log::warn!(
                "Replaced a scene that still had {} node(s); their entities stay alive",
                previous.len()
            );
        }
        self.register_loaded_scene_nodes();
        log::info!("Scene '{path}' is now current");
        self.current_scene_path = Some(path);

        self.on_scene_start_systems();
        Ok(())
    }

    fn register_loaded_scene_nodes(&mut self) {
        for entity in self.scene.walk() {
            self.notify_signature_changed(entity);
        }
    }

    // --- Transforms and camera ---

    /// World-space transform of `entity`
    pub fn world_transform(&self, entity: Entity) -> Transform2DComponent {
        transform::compose_world_transform(&self.scene, &self.components, entity)
    }

    /// Combined transform of the ancestors of `entity`
    pub fn combined_parents_transform(&self, entity: Entity) -> Transform2DComponent {
        transform::combined_parents_transform(&self.scene, &self.components, entity)
    }

    /// Screen-space transform of `entity`
    pub fn translate_entity_transform(&self, entity: Entity) -> Transform2DComponent {
        transform::translate_entity_transform(&self.scene, &self.components, &self.camera, entity)
    }

    /// Active camera
    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    /// Active camera, mutable
    pub fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }

    /// Replace the active camera
    pub fn set_camera(&mut self, camera: Camera2D) {
        self.camera = camera;
    }

    /// Restore the default camera
    pub fn reset_camera(&mut self) {
        self.camera = Camera2D::default();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
