//! Scene graph
//!
//! A scene is a single tree of entities. Every node references its parent and
//! keeps its children in insertion order; the node table owns all of them, so
//! a child always refers to a node of the same graph.

use std::collections::HashMap;

use crate::ecs::Entity;

/// One entity's place in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNode {
    /// Entity this node stands for
    pub entity: Entity,
    /// `None` for the root
    pub parent: Option<Entity>,
    /// Direct children in insertion order
    pub children: Vec<Entity>,
}

impl SceneNode {
    fn new(entity: Entity, parent: Option<Entity>) -> Self {
        Self {
            entity,
            parent,
            children: Vec::new(),
        }
    }
}

/// Tree of scene nodes
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    root: Option<Entity>,
    nodes: HashMap<Entity, SceneNode>,
}

impl SceneGraph {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Root entity, if the scene has one
    pub fn root(&self) -> Option<Entity> {
        self.root
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Make `entity` the root of the scene
    ///
    /// Ignored with a warning if the scene already has a root or the entity is
    /// already part of it.
    pub fn add_root_node(&mut self, entity: Entity) {
        if let Some(root) = self.root {
            log::warn!(
                "Scene already has root entity '{}'; not adding '{}' as root",
                root.id(),
                entity.id()
            );
            return;
        }
        if self.nodes.contains_key(&entity) {
            log::warn!("Entity '{}' is already in the scene", entity.id());
            return;
        }
        self.nodes.insert(entity, SceneNode::new(entity, None));
        self.root = Some(entity);
    }

    /// Attach `child` under `parent`
    ///
    /// # Panics
    /// If `parent` is not in the scene or `child` already is.
    pub fn add_child_node(&mut self, child: Entity, parent: Entity) {
        assert!(
            !self.nodes.contains_key(&child),
            "Entity '{}' is already in the scene!",
            child.id()
        );
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            panic!(
                "Parent entity '{}' of '{}' is not in the scene!",
                parent.id(),
                child.id()
            );
        };
        parent_node.children.push(child);
        self.nodes.insert(child, SceneNode::new(child, Some(parent)));
    }

    /// Remove `entity` and its whole subtree
    ///
    /// Returns the removed entities in pre-order, `entity` first. Removing an
    /// entity that is not in the scene only logs a warning.
    pub fn delete_node(&mut self, entity: Entity) -> Vec<Entity> {
        let Some(parent) = self.nodes.get(&entity).map(|node| node.parent) else {
            log::warn!("Entity '{}' is not in the scene; nothing to delete", entity.id());
            return Vec::new();
        };

        if let Some(parent) = parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|&child| child != entity);
            }
        }
        if self.root == Some(entity) {
            self.root = None;
        }

        let removed = self.subtree(entity);
        for removed_entity in &removed {
            self.nodes.remove(removed_entity);
        }
        removed
    }

    /// Whether `entity` has a node in this scene
    pub fn is_node_in_scene(&self, entity: Entity) -> bool {
        self.nodes.contains_key(&entity)
    }

    /// Node of `entity`
    ///
    /// # Panics
    /// If the entity is not in the scene.
    pub fn scene_node(&self, entity: Entity) -> &SceneNode {
        self.nodes
            .get(&entity)
            .unwrap_or_else(|| panic!("Entity '{}' is not in the scene!", entity.id()))
    }

    /// Node of `entity`, if present
    pub fn try_scene_node(&self, entity: Entity) -> Option<&SceneNode> {
        self.nodes.get(&entity)
    }

    /// Parent of `entity`; `None` for the root and for entities outside the scene
    pub fn parent_of(&self, entity: Entity) -> Option<Entity> {
        self.nodes.get(&entity).and_then(|node| node.parent)
    }

    /// Direct children of `entity`
    pub fn children_of(&self, entity: Entity) -> &[Entity] {
        self.nodes
            .get(&entity)
            .map_or(&[] as &[Entity], |node| node.children.as_slice())
    }

    /// Ancestors of `entity`, closest parent first
    pub fn ancestors(&self, entity: Entity) -> Vec<Entity> {
        let mut ancestors = Vec::new();
        let mut current = self.parent_of(entity);
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.parent_of(parent);
        }
        ancestors
    }

    /// `entity` and every descendant, pre-order
    pub fn subtree(&self, entity: Entity) -> Vec<Entity> {
        let mut visited = Vec::new();
        if !self.nodes.contains_key(&entity) {
            return visited;
        }
        let mut stack = vec![entity];
        while let Some(current) = stack.pop() {
            visited.push(current);
            // Reverse so the first child is visited first
            stack.extend(self.children_of(current).iter().rev().copied());
        }
        visited
    }

    /// Every node of the scene, pre-order from the root
    pub fn walk(&self) -> Vec<Entity> {
        self.root.map_or_else(Vec::new, |root| self.subtree(root))
    }

    /// Drop every node
    pub fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
    }
}
