//! System registry
//!
//! Owns every registered system together with its required signature, hook
//! mask, enabled flag and matched-entity set. Signature and tag notifications
//! from the [`World`](super::World) are routed here; hook dispatch walks the
//! systems in registration order.

use std::any::{type_name, TypeId};
use std::collections::{BTreeSet, HashMap};

use super::entity::Entity;
use super::signature::ComponentSignature;
use super::system::{AnySystem, DispatchEnv, System, SystemContext, SystemHooks};

struct SystemEntry {
    name: &'static str,
    system: Box<dyn AnySystem>,
    signature: ComponentSignature,
    hooks: SystemHooks,
    enabled: bool,
    entities: BTreeSet<Entity>,
    /// Tags last reported to a tag-indexed system, per matched entity
    reported_tags: HashMap<Entity, Vec<String>>,
}

impl SystemEntry {
    fn wants(&self, hook: SystemHooks) -> bool {
        self.enabled && self.hooks.contains(hook)
    }

    /// Re-evaluate one entity against this system's signature
    fn refresh(&mut self, entity: Entity, enabled_signature: ComponentSignature, tags: &[String]) {
        if enabled_signature.matches(self.signature) {
            self.entities.insert(entity);
            self.report_tags(entity, tags);
        } else if self.entities.remove(&entity) {
            self.forget_tags(entity, tags);
        }
    }

    /// Tell a tag-indexed system the entity's current tags
    ///
    /// The old tags are the ones reported last, so the system's index never
    /// keeps tags that were changed behind its back.
    fn report_tags(&mut self, entity: Entity, tags: &[String]) {
        if !self.hooks.contains(SystemHooks::TAG_CHANGED) {
            return;
        }
        let old_tags = self
            .reported_tags
            .insert(entity, tags.to_vec())
            .unwrap_or_default();
        self.system.on_entity_tags_updated(entity, &old_tags, tags);
    }

    /// Tell a tag-indexed system the entity left it, with the tags it was reported under
    fn forget_tags(&mut self, entity: Entity, fallback_tags: &[String]) {
        if !self.hooks.contains(SystemHooks::TAG_CHANGED) {
            return;
        }
        let tags = self
            .reported_tags
            .remove(&entity)
            .unwrap_or_else(|| fallback_tags.to_vec());
        self.system.on_entity_tags_removed(entity, &tags);
    }
}

/// Registered systems, indexed by type
#[derive(Default)]
pub struct SystemRegistry {
    entries: Vec<SystemEntry>,
    index_by_type: HashMap<TypeId, usize>,
}

impl SystemRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a system instance
    ///
    /// The system starts enabled with an empty signature and joins the
    /// dispatch list of every hook in `hooks`.
    ///
    /// # Panics
    /// If a system of the same type is already registered.
    pub fn register<T: System>(&mut self, system: T, hooks: SystemHooks) -> &mut T {
        let type_id = TypeId::of::<T>();
        assert!(
            !self.index_by_type.contains_key(&type_id),
            "Registering system '{}' more than once!",
            type_name::<T>()
        );

        let index = self.entries.len();
        self.entries.push(SystemEntry {
            name: type_name::<T>(),
            system: Box::new(system),
            signature: ComponentSignature::EMPTY,
            hooks,
            enabled: true,
            entities: BTreeSet::new(),
            reported_tags: HashMap::new(),
        });
        self.index_by_type.insert(type_id, index);
        log::debug!("Registered system '{}' with hooks {:?}", type_name::<T>(), hooks);

        self.get_mut::<T>()
    }

    /// Whether a system of type `T` is registered
    pub fn has<T: System>(&self) -> bool {
        self.index_by_type.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered systems
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no system is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Type names of the registered systems, in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Set the required signature of `T`
    ///
    /// Takes effect at the next signature notification for each entity.
    pub fn set_signature<T: System>(&mut self, signature: ComponentSignature) {
        self.entry_mut::<T>().signature = signature;
    }

    /// Required signature of `T`
    pub fn signature<T: System>(&self) -> ComponentSignature {
        self.entry::<T>().signature
    }

    /// Hooks `T` joined at registration
    pub fn hooks<T: System>(&self) -> SystemHooks {
        self.entry::<T>().hooks
    }

    /// Shared access to the system instance
    pub fn get<T: System>(&self) -> &T {
        self.entry::<T>()
            .system
            .as_any()
            .downcast_ref::<T>()
            .unwrap_or_else(|| unreachable!("system type index is out of sync"))
    }

    /// Exclusive access to the system instance
    pub fn get_mut<T: System>(&mut self) -> &mut T {
        self.entry_mut::<T>()
            .system
            .as_any_mut()
            .downcast_mut::<T>()
            .unwrap_or_else(|| unreachable!("system type index is out of sync"))
    }

    /// Entities currently matched by `T`
    pub fn entities<T: System>(&self) -> &BTreeSet<Entity> {
        &self.entry::<T>().entities
    }

    /// Whether `T` takes part in dispatch
    pub fn is_enabled<T: System>(&self) -> bool {
        self.entry::<T>().enabled
    }

    /// Resume dispatching hooks to `T`
    pub fn enable<T: System>(&mut self) {
        let entry = self.entry_mut::<T>();
        if entry.enabled {
            log::warn!("System '{}' is already enabled!", entry.name);
            return;
        }
        entry.enabled = true;
    }

    /// Stop dispatching hooks to `T`; its matched set keeps tracking changes
    pub fn disable<T: System>(&mut self) {
        let entry = self.entry_mut::<T>();
        if !entry.enabled {
            log::warn!("System '{}' is already disabled!", entry.name);
            return;
        }
        entry.enabled = false;
    }

    /// Route an entity's new enabled signature to every system
    pub fn entity_signature_changed(
        &mut self,
        entity: Entity,
        enabled_signature: ComponentSignature,
        tags: &[String],
    ) {
        for entry in &mut self.entries {
            entry.refresh(entity, enabled_signature, tags);
        }
    }

    /// Route an entity's enabled signature to `T` only
    pub fn entity_signature_changed_for<T: System>(
        &mut self,
        entity: Entity,
        enabled_signature: ComponentSignature,
        tags: &[String],
    ) {
        self.entry_mut::<T>().refresh(entity, enabled_signature, tags);
    }

    /// Forward a tag change to tag-indexed systems that match the entity
    ///
    /// `old_tags` is only used for systems that were never told about the
    /// entity's tags; the others get the tags they were given last.
    pub fn entity_tags_changed(&mut self, entity: Entity, old_tags: &[String], new_tags: &[String]) {
        for entry in &mut self.entries {
            if !entry.hooks.contains(SystemHooks::TAG_CHANGED) || !entry.entities.contains(&entity) {
                continue;
            }
            entry
                .reported_tags
                .entry(entity)
                .or_insert_with(|| old_tags.to_vec());
            entry.report_tags(entity, new_tags);
        }
    }

    /// Drop a destroyed entity from every matched set
    ///
    /// Tag-indexed systems are told the tags they last saw for the entity,
    /// whatever `tags` says.
    pub fn entity_destroyed(&mut self, entity: Entity, tags: &[String]) {
        for entry in &mut self.entries {
            if entry.entities.remove(&entity) {
                entry.forget_tags(entity, tags);
            }
        }
    }

    pub(crate) fn update_systems(&mut self, env: &mut DispatchEnv<'_>, delta_time: f32) {
        self.dispatch(SystemHooks::UPDATE, env, |system, ctx| {
            system.on_update(ctx, delta_time);
        });
    }

    pub(crate) fn physics_update_systems(&mut self, env: &mut DispatchEnv<'_>, delta_time: f32) {
        self.dispatch(SystemHooks::PHYSICS_UPDATE, env, |system, ctx| {
            system.on_physics_update(ctx, delta_time);
        });
    }

    pub(crate) fn render_systems(&mut self, env: &mut DispatchEnv<'_>) {
        self.dispatch(SystemHooks::RENDER, env, |system, ctx| system.on_render(ctx));
    }

    pub(crate) fn on_scene_start_systems(&mut self, env: &mut DispatchEnv<'_>) {
        self.dispatch(SystemHooks::SCENE_START, env, |system, ctx| {
            system.on_scene_start(ctx);
        });
    }

    pub(crate) fn on_scene_end_systems(&mut self, env: &mut DispatchEnv<'_>) {
        self.dispatch(SystemHooks::SCENE_END, env, |system, ctx| system.on_scene_end(ctx));
    }

    fn dispatch<F>(&mut self, hook: SystemHooks, env: &mut DispatchEnv<'_>, mut call: F)
    where
        F: FnMut(&mut dyn AnySystem, &mut SystemContext<'_>),
    {
        for entry in &mut self.entries {
            if !entry.wants(hook) {
                continue;
            }
            let mut ctx = SystemContext::new(env, &entry.entities);
            call(entry.system.as_mut(), &mut ctx);
        }
    }

    fn entry<T: System>(&self) -> &SystemEntry {
        let index = self.index_of::<T>();
        &self.entries[index]
    }

    fn entry_mut<T: System>(&mut self) -> &mut SystemEntry {
        let index = self.index_of::<T>();
        &mut self.entries[index]
    }

    fn index_of<T: System>(&self) -> usize {
        *self
            .index_by_type
            .get(&TypeId::of::<T>())
            .unwrap_or_else(|| panic!("System '{}' not registered!", type_name::<T>()))
    }
}
