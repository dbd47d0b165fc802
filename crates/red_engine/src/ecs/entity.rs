//! Entity implementation
//!
//! [`EntityRegistry`] hands out entity identifiers and keeps the two component
//! signatures of every entity. Destruction is two-phase: [`EntityRegistry::destroy_entity`]
//! only marks the entity, and the identifier becomes reusable once
//! [`EntityRegistry::finalize_queued_deletions`] runs at the frame boundary.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::signature::ComponentSignature;

/// Entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entity {
    id: u32,
}

impl Entity {
    /// Reserved identifier that is never assigned to a live entity
    pub const NULL: Self = Self { id: 0 };

    /// Create an entity handle from a raw ID
    pub const fn from_raw(id: u32) -> Self {
        Self { id }
    }

    /// Get the entity ID
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Whether this is [`Entity::NULL`]
    pub const fn is_null(&self) -> bool {
        self.id == 0
    }

    const fn index(self) -> usize {
        self.id as usize
    }
}

/// Shorthand for [`Entity::NULL`]
pub const NULL_ENTITY: Entity = Entity::NULL;

/// Allocates entity identifiers and stores per-entity signatures
#[derive(Debug)]
pub struct EntityRegistry {
    max_entities: usize,
    /// Next never-used ID; starts at 1 because 0 is reserved
    next_id: u32,
    living_count: usize,
    available_ids: VecDeque<Entity>,
    /// Indexed by entity ID
    signatures: Vec<ComponentSignature>,
    enabled_signatures: Vec<ComponentSignature>,
    alive: Vec<bool>,
    queued_for_deletion: Vec<Entity>,
}

impl EntityRegistry {
    /// Create a registry that allows at most `max_entities` live entities
    pub fn new(max_entities: usize) -> Self {
        Self {
            max_entities,
            next_id: 1,
            living_count: 0,
            available_ids: VecDeque::new(),
            signatures: vec![ComponentSignature::EMPTY],
            enabled_signatures: vec![ComponentSignature::EMPTY],
            alive: vec![false],
            queued_for_deletion: Vec::new(),
        }
    }

    /// Create a new entity, reusing the oldest finalized ID if one exists
    ///
    /// # Panics
    /// If the live entity cap is reached.
    pub fn create_entity(&mut self) -> Entity {
        assert!(
            self.living_count < self.max_entities,
            "Too many entities to create! (limit is {})",
            self.max_entities
        );

        let entity = self.available_ids.pop_front().unwrap_or_else(|| {
            let entity = Entity::from_raw(self.next_id);
            self.next_id += 1;
            self.signatures.push(ComponentSignature::EMPTY);
            self.enabled_signatures.push(ComponentSignature::EMPTY);
            self.alive.push(false);
            entity
        });

        self.alive[entity.index()] = true;
        self.living_count += 1;
        entity
    }

    /// Mark an entity as destroyed
    ///
    /// The live count drops right away but signatures and the ID are only
    /// released by [`Self::finalize_queued_deletions`]. Destroying an entity
    /// that is not alive (already pending, or never created) is a no-op.
    pub fn destroy_entity(&mut self, entity: Entity) {
        if !self.is_alive(entity) {
            log::warn!("Attempted to destroy entity '{}' which is not alive!", entity.id());
            return;
        }
        self.alive[entity.index()] = false;
        self.queued_for_deletion.push(entity);
        self.living_count -= 1;
    }

    /// Release every entity destroyed since the last call
    ///
    /// Clears both signatures and returns the IDs to the free pool. Returns the
    /// entities that were finalized, in destruction order.
    pub fn finalize_queued_deletions(&mut self) -> Vec<Entity> {
        let finalized = std::mem::take(&mut self.queued_for_deletion);
        for &entity in &finalized {
            self.signatures[entity.index()] = ComponentSignature::EMPTY;
            self.enabled_signatures[entity.index()] = ComponentSignature::EMPTY;
            self.available_ids.push_back(entity);
        }
        if !finalized.is_empty() {
            log::debug!("Finalized {} entity deletion(s)", finalized.len());
        }
        finalized
    }

    /// Number of logically live entities
    pub fn alive_entities(&self) -> usize {
        self.living_count
    }

    /// Configured live entity cap
    pub fn max_entities(&self) -> usize {
        self.max_entities
    }

    /// Whether the entity was created and not yet destroyed
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    /// Every live entity in ascending ID order
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, &alive)| alive)
            .filter_map(|(id, _)| u32::try_from(id).ok().map(Entity::from_raw))
    }

    /// Whether the entity is destroyed but not yet finalized
    pub fn is_pending_deletion(&self, entity: Entity) -> bool {
        self.queued_for_deletion.contains(&entity)
    }

    /// Raw signature: every attached component type
    pub fn signature(&self, entity: Entity) -> ComponentSignature {
        self.signatures
            .get(entity.index())
            .copied()
            .unwrap_or(ComponentSignature::EMPTY)
    }

    /// Overwrite the raw signature
    ///
    /// Bits removed here are also removed from the enabled signature.
    pub fn set_signature(&mut self, entity: Entity, signature: ComponentSignature) {
        let index = self.checked_index(entity);
        self.signatures[index] = signature;
        self.enabled_signatures[index] = self.enabled_signatures[index] & signature;
    }

    /// Enabled signature: attached components currently active for matching
    pub fn enabled_signature(&self, entity: Entity) -> ComponentSignature {
        self.enabled_signatures
            .get(entity.index())
            .copied()
            .unwrap_or(ComponentSignature::EMPTY)
    }

    /// Overwrite the enabled signature, masked by the raw signature
    pub fn set_enabled_signature(&mut self, entity: Entity, signature: ComponentSignature) {
        let index = self.checked_index(entity);
        let masked = signature & self.signatures[index];
        if masked != signature {
            log::warn!(
                "Enabled signature for entity '{}' names components that are not attached; ignoring them",
                entity.id()
            );
        }
        self.enabled_signatures[index] = masked;
    }

    /// Re-enable every attached component
    pub fn reset_enabled_signature(&mut self, entity: Entity) {
        let index = self.checked_index(entity);
        self.enabled_signatures[index] = self.signatures[index];
    }

    fn checked_index(&self, entity: Entity) -> usize {
        assert!(
            !entity.is_null() && entity.index() < self.signatures.len(),
            "Entity '{}' was never created!",
            entity.id()
        );
        entity.index()
    }
}
