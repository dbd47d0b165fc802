//! Component Storage
//!
//! One dense array per registered component type. Each array maps
//! entity → slot and slot → entity so lookups are O(1) and removal can
//! swap-remove to keep the values contiguous.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use super::entity::Entity;
use super::signature::{ComponentType, MAX_COMPONENT_TYPES};
use super::Component;

/// Dense storage for every `T` attached to an entity
pub struct ComponentArray<T: Component> {
    components: Vec<T>,
    entity_to_index: HashMap<Entity, usize>,
    index_to_entity: Vec<Entity>,
}

impl<T: Component> Default for ComponentArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentArray<T> {
    /// Create an empty array
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            entity_to_index: HashMap::new(),
            index_to_entity: Vec::new(),
        }
    }

    /// Insert a component for an entity that does not have one yet
    pub fn insert(&mut self, entity: Entity, component: T) {
        assert!(
            !self.entity_to_index.contains_key(&entity),
            "Component '{}' added to entity '{}' more than once!",
            type_name::<T>(),
            entity.id()
        );
        self.entity_to_index.insert(entity, self.components.len());
        self.index_to_entity.push(entity);
        self.components.push(component);
    }

    /// Remove and return the entity's component, if any
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.entity_to_index.remove(&entity)?;
        let removed = self.components.swap_remove(index);
        self.index_to_entity.swap_remove(index);
        // The former last element now lives at `index`
        if let Some(&moved) = self.index_to_entity.get(index) {
            self.entity_to_index.insert(moved, index);
        }
        Some(removed)
    }

    /// Shared access to the entity's component
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.entity_to_index.get(&entity).map(|&i| &self.components[i])
    }

    /// Exclusive access to the entity's component
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.entity_to_index
            .get(&entity)
            .map(|&i| &mut self.components[i])
    }

    /// Whether the entity has a component in this array
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_to_index.contains_key(&entity)
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the array holds no components
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Dense iteration in storage order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.index_to_entity.iter().copied().zip(self.components.iter())
    }
}

/// Type-erased view of a [`ComponentArray`]
pub trait ErasedComponentArray: Any {
    /// Drop the entity's component if present
    fn entity_destroyed(&mut self, entity: Entity);
    /// Whether the entity has a component in this array
    fn contains_entity(&self, entity: Entity) -> bool;
    /// Name of the stored component type
    fn component_name(&self) -> &'static str;
    /// Downcast support
    fn as_any(&self) -> &dyn Any;
    /// Downcast support
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedComponentArray for ComponentArray<T> {
    fn entity_destroyed(&mut self, entity: Entity) {
        self.remove(entity);
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Registry of component types and their arrays
///
/// Arrays are addressed by the [`ComponentType`] handed out at registration.
/// Every accessor panics when `T` was never registered or the entity lacks the
/// component; those are wiring bugs, not runtime conditions.
#[derive(Default)]
pub struct ComponentStore {
    component_types: HashMap<TypeId, ComponentType>,
    arrays: Vec<Box<dyn ErasedComponentArray>>,
}

impl ComponentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` and return its component type index
    pub fn register<T: Component>(&mut self) -> ComponentType {
        let type_id = TypeId::of::<T>();
        assert!(
            !self.component_types.contains_key(&type_id),
            "Registering component type '{}' more than once!",
            type_name::<T>()
        );
        let component_type = ComponentType::try_from(self.arrays.len())
            .ok()
            .filter(|&ty| ty < MAX_COMPONENT_TYPES)
            .unwrap_or_else(|| {
                panic!(
                    "Cannot register '{}': limit of {MAX_COMPONENT_TYPES} component types reached!",
                    type_name::<T>()
                )
            });

        self.component_types.insert(type_id, component_type);
        self.arrays.push(Box::new(ComponentArray::<T>::new()));
        log::debug!(
            "Registered component '{}' as type {component_type}",
            type_name::<T>()
        );
        component_type
    }

    /// Whether `T` has been registered
    pub fn is_registered<T: Component>(&self) -> bool {
        self.component_types.contains_key(&TypeId::of::<T>())
    }

    /// Component type index of `T`
    pub fn component_type<T: Component>(&self) -> ComponentType {
        *self
            .component_types
            .get(&TypeId::of::<T>())
            .unwrap_or_else(|| panic!("Component '{}' not registered!", type_name::<T>()))
    }

    /// Number of registered component types
    pub fn registered_count(&self) -> usize {
        self.arrays.len()
    }

    /// Typed array for `T`
    pub fn array<T: Component>(&self) -> &ComponentArray<T> {
        let index = self.component_type::<T>() as usize;
        self.arrays[index]
            .as_any()
            .downcast_ref::<ComponentArray<T>>()
            .unwrap_or_else(|| unreachable!("component array type mismatch"))
    }

    /// Typed array for `T`, mutable
    pub fn array_mut<T: Component>(&mut self) -> &mut ComponentArray<T> {
        let index = self.component_type::<T>() as usize;
        self.arrays[index]
            .as_any_mut()
            .downcast_mut::<ComponentArray<T>>()
            .unwrap_or_else(|| unreachable!("component array type mismatch"))
    }

    /// Attach a component
    ///
    /// # Panics
    /// If `T` is unregistered or the entity already has a `T`.
    pub fn add<T: Component>(&mut self, entity: Entity, component: T) {
        self.array_mut::<T>().insert(entity, component);
    }

    /// Overwrite an attached component
    pub fn update<T: Component>(&mut self, entity: Entity, component: T) {
        *self.get_mut::<T>(entity) = component;
    }

    /// Detach and return a component
    ///
    /// # Panics
    /// If the entity has no `T`.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> T {
        self.array_mut::<T>().remove(entity).unwrap_or_else(|| {
            panic!(
                "Removing non-existent component '{}' from entity '{}'!",
                type_name::<T>(),
                entity.id()
            )
        })
    }

    /// Shared access to an attached component
    ///
    /// # Panics
    /// If the entity has no `T`.
    pub fn get<T: Component>(&self, entity: Entity) -> &T {
        self.try_get::<T>(entity)
            .unwrap_or_else(|| missing_component::<T>(entity))
    }

    /// Exclusive access to an attached component
    ///
    /// # Panics
    /// If the entity has no `T`.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        self.array_mut::<T>()
            .get_mut(entity)
            .unwrap_or_else(|| missing_component::<T>(entity))
    }

    /// Shared access, `None` when the entity has no `T`
    pub fn try_get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.array::<T>().get(entity)
    }

    /// Copy of the component, or `T::default()` when absent
    pub fn get_or_default<T: Component + Clone + Default>(&self, entity: Entity) -> T {
        self.try_get::<T>(entity).cloned().unwrap_or_default()
    }

    /// Whether the entity has a `T`
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.array::<T>().contains(entity)
    }

    /// Dense iteration over every `T`
    pub fn iter<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.array::<T>().iter()
    }

    /// Drop every component the entity owns, regardless of type
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for array in &mut self.arrays {
            if array.contains_entity(entity) {
                log::trace!(
                    "Dropping '{}' of destroyed entity '{}'",
                    array.component_name(),
                    entity.id()
                );
                array.entity_destroyed(entity);
            }
        }
    }
}

fn missing_component<T: Component>(entity: Entity) -> ! {
    panic!(
        "Entity '{}' has no component '{}'!",
        entity.id(),
        type_name::<T>()
    )
}
