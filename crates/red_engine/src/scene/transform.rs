//! Hierarchical transform composition
//!
//! World transforms are never cached; they are folded from the scene graph
//! every time they are asked for.

use crate::ecs::components::Transform2DComponent;
use crate::ecs::storage::ComponentStore;
use crate::ecs::Entity;

use super::{Camera2D, SceneGraph};

/// Combined transform of every ancestor of `entity`, root first
///
/// Ancestors without a transform are skipped. Entities outside the scene have
/// no ancestors and get the identity.
pub fn combined_parents_transform(
    scene: &SceneGraph,
    components: &ComponentStore,
    entity: Entity,
) -> Transform2DComponent {
    scene
        .ancestors(entity)
        .into_iter()
        .rev()
        .filter_map(|ancestor| components.try_get::<Transform2DComponent>(ancestor))
        .fold(Transform2DComponent::identity(), |acc, parent| acc.combine(parent))
}

/// World-space transform of `entity`
///
/// A missing own transform counts as the identity. When the entity's z-index
/// is not relative to its parent, the parents' z-index is ignored.
pub fn compose_world_transform(
    scene: &SceneGraph,
    components: &ComponentStore,
    entity: Entity,
) -> Transform2DComponent {
    let own = components
        .try_get::<Transform2DComponent>(entity)
        .copied()
        .unwrap_or_default();
    let parents = combined_parents_transform(scene, components, entity);

    let mut world = parents.combine(&own);
    if !own.z_index_relative_to_parent {
        world.z_index = own.z_index;
    }
    world
}

/// World transform followed by the camera, unless the entity ignores it
pub fn translate_entity_transform(
    scene: &SceneGraph,
    components: &ComponentStore,
    camera: &Camera2D,
    entity: Entity,
) -> Transform2DComponent {
    let world = compose_world_transform(scene, components, entity);
    if world.ignore_camera {
        world
    } else {
        camera.apply(&world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use approx::assert_relative_eq;

    struct Fixture {
        scene: SceneGraph,
        components: ComponentStore,
    }

    impl Fixture {
        fn new() -> Self {
            let mut components = ComponentStore::new();
            components.register::<Transform2DComponent>();
            Self {
                scene: SceneGraph::new(),
                components,
            }
        }

        /// Chain of `len` entities, each one translated by `step` from its parent
        fn chain(&mut self, len: u32, step: Vec2) -> Entity {
            let root = Entity::from_raw(1);
            self.scene.add_root_node(root);
            self.components.add(root, Transform2DComponent::at(step));
            let mut last = root;
            for id in 2..=len {
                let e = Entity::from_raw(id);
                self.scene.add_child_node(e, last);
                self.components.add(e, Transform2DComponent::at(step));
                last = e;
            }
            last
        }
    }

    #[test]
    fn test_root_without_transform_is_identity() {
        let mut fixture = Fixture::new();
        let root = Entity::from_raw(1);
        fixture.scene.add_root_node(root);

        let world = compose_world_transform(&fixture.scene, &fixture.components, root);
        assert_eq!(world, Transform2DComponent::identity());
    }

    #[test]
    fn test_translations_accumulate_down_the_chain() {
        let mut fixture = Fixture::new();
        let step = Vec2::new(1.5, -2.0);
        let leaf = fixture.chain(6, step);

        let world = compose_world_transform(&fixture.scene, &fixture.components, leaf);
        assert_relative_eq!(world.position.x, 9.0);
        assert_relative_eq!(world.position.y, -12.0);
    }

    #[test]
    fn test_parent_child_composition() {
        let mut fixture = Fixture::new();
        let parent = Entity::from_raw(1);
        let child = Entity::from_raw(2);
        fixture.scene.add_root_node(parent);
        fixture.scene.add_child_node(child, parent);
        fixture.components.add(
            parent,
            Transform2DComponent::at(Vec2::new(10.0, 0.0)).with_z_index(3, true),
        );
        fixture
            .components
            .add(child, Transform2DComponent::at(Vec2::new(5.0, 0.0)).with_z_index(1, true));

        let world = compose_world_transform(&fixture.scene, &fixture.components, child);
        assert_eq!(world.position, Vec2::new(15.0, 0.0));
        assert_eq!(world.z_index, 4);

        fixture
            .components
            .get_mut::<Transform2DComponent>(child)
            .z_index_relative_to_parent = false;
        let world = compose_world_transform(&fixture.scene, &fixture.components, child);
        assert_eq!(world.z_index, 1);
    }

    #[test]
    fn test_ancestor_without_transform_is_skipped() {
        let mut fixture = Fixture::new();
        let root = Entity::from_raw(1);
        let middle = Entity::from_raw(2);
        let leaf = Entity::from_raw(3);
        fixture.scene.add_root_node(root);
        fixture.scene.add_child_node(middle, root);
        fixture.scene.add_child_node(leaf, middle);
        fixture
            .components
            .add(root, Transform2DComponent::at(Vec2::new(2.0, 2.0)).with_scale(Vec2::new(2.0, 2.0)));
        fixture.components.add(leaf, Transform2DComponent::at(Vec2::new(1.0, 0.0)));

        let world = compose_world_transform(&fixture.scene, &fixture.components, leaf);
        assert_eq!(world.position, Vec2::new(3.0, 2.0));
        assert_eq!(world.scale, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_ignore_camera_skips_camera() {
        let mut fixture = Fixture::new();
        let e = Entity::from_raw(1);
        fixture.scene.add_root_node(e);
        fixture.components.add(
            e,
            Transform2DComponent::at(Vec2::new(50.0, 50.0)).with_ignore_camera(true),
        );
        let camera = Camera2D::new(Vec2::new(40.0, 40.0));

        let screen = translate_entity_transform(&fixture.scene, &fixture.components, &camera, e);
        assert_eq!(screen.position, Vec2::new(50.0, 50.0));

        fixture.components.get_mut::<Transform2DComponent>(e).ignore_camera = false;
        let screen = translate_entity_transform(&fixture.scene, &fixture.components, &camera, e);
        assert_eq!(screen.position, Vec2::new(10.0, 10.0));
    }
}
