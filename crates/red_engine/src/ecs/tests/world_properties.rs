//! Invariants that must hold after every kind of world mutation

use super::{spawn, spawn_collider};
use crate::config::EngineConfig;
use crate::ecs::components::{
    ColliderComponent, SceneComponent, SpriteComponent, Transform2DComponent,
};
use crate::ecs::systems::{self, CollisionSystem};
use crate::ecs::{ComponentSignature, Entity, System, SystemHooks, World};
use crate::foundation::math::Vec2;
use crate::physics::collision::entity_collision_result_by_tag;

struct TransformWatcher;

impl System for TransformWatcher {}

fn watcher_world() -> World {
    let mut world = World::new();
    let signature = ComponentSignature::from_types(&[world.component_type::<Transform2DComponent>()]);
    world.register_system(TransformWatcher, signature, SystemHooks::NONE);
    world
}

/// Every matched entity's enabled signature contains the system's signature,
/// and every live entity whose enabled signature does is matched
fn assert_matching_is_exact(world: &World) {
    let required = world.systems().signature::<TransformWatcher>();
    let matched = world.system_entities::<TransformWatcher>();
    for &entity in matched {
        assert!(world.is_alive(entity), "dead entity {entity:?} is still matched");
        assert!(world.entity_enabled_signature(entity).matches(required));
    }
    for id in 1..=32 {
        let entity = Entity::from_raw(id);
        if world.is_alive(entity) && world.entity_enabled_signature(entity).matches(required) {
            assert!(matched.contains(&entity), "{entity:?} should be matched");
        }
    }
}

#[test]
fn test_matching_tracks_every_mutation() {
    let mut world = watcher_world();
    let entity = world.create_entity();
    assert_matching_is_exact(&world);

    world.add_component(entity, Transform2DComponent::default());
    assert_matching_is_exact(&world);
    assert!(world.system_entities::<TransformWatcher>().contains(&entity));

    world.disable_component::<Transform2DComponent>(entity);
    assert_matching_is_exact(&world);
    assert!(world.has_component::<Transform2DComponent>(entity));
    assert!(!world.system_entities::<TransformWatcher>().contains(&entity));

    world.enable_component::<Transform2DComponent>(entity);
    assert_matching_is_exact(&world);
    assert!(world.system_entities::<TransformWatcher>().contains(&entity));

    let removed = world.remove_component::<Transform2DComponent>(entity);
    assert_eq!(removed, Transform2DComponent::default());
    assert_matching_is_exact(&world);
    assert!(world.system_entities::<TransformWatcher>().is_empty());

    world.add_component(entity, Transform2DComponent::default());
    world.queue_destroy_entity(entity);
    world.destroy_queued_entities();
    assert_matching_is_exact(&world);
    assert!(world.system_entities::<TransformWatcher>().is_empty());
}

#[test]
fn test_enabled_signature_is_subset_of_signature() {
    let mut world = watcher_world();
    let entity = spawn(&mut world, "Subject", Vec2::zeros());
    world.add_component(entity, SpriteComponent::default());

    world.disable_component::<SpriteComponent>(entity);
    let enabled = world.entity_enabled_signature(entity);
    assert!(enabled.is_subset_of(world.entity_signature(entity)));
    assert!(!enabled.contains(world.component_type::<SpriteComponent>()));

    // Removing a disabled component keeps the subset relation
    world.remove_component::<SpriteComponent>(entity);
    assert!(world
        .entity_enabled_signature(entity)
        .is_subset_of(world.entity_signature(entity)));
    assert!(!world.entity_signature(entity).contains(world.component_type::<SpriteComponent>()));
}

#[test]
#[should_panic(expected = "not attached")]
fn test_enabling_missing_component_panics() {
    let mut world = World::new();
    let entity = world.create_entity();
    world.enable_component::<SpriteComponent>(entity);
}

#[test]
fn test_system_registered_late_matches_existing_entities() {
    let mut world = World::new();
    let early = spawn(&mut world, "Early", Vec2::zeros());
    let signature = ComponentSignature::from_types(&[world.component_type::<Transform2DComponent>()]);
    world.register_system(TransformWatcher, signature, SystemHooks::NONE);
    assert!(world.system_entities::<TransformWatcher>().contains(&early));
}

#[test]
fn test_ids_are_recycled_only_after_flush() {
    let mut world = World::new();
    let first = world.create_entity();
    let second = world.create_entity();

    world.queue_destroy_entity(first);
    let third = world.create_entity();
    assert_ne!(third, first, "an ID must not be reused before the flush");

    world.destroy_queued_entities();
    let fourth = world.create_entity();
    assert_eq!(fourth, first);
    assert!(world.is_alive(second));
    assert_eq!(world.alive_entities(), 3);
}

#[test]
fn test_duplicate_destroy_is_ignored() {
    let mut world = World::new();
    let entity = spawn(&mut world, "Twice", Vec2::zeros());

    world.queue_destroy_entity(entity);
    world.queue_destroy_entity(entity);
    assert_eq!(world.queued_for_destruction(), &[entity]);

    assert_eq!(world.destroy_queued_entities(), vec![entity]);
    assert!(world.destroy_queued_entities().is_empty());

    // Queueing an already destroyed entity is harmless too
    world.queue_destroy_entity(entity);
    assert!(world.destroy_queued_entities().is_empty());
    assert_eq!(world.alive_entities(), 0);
}

#[test]
fn test_destroying_parent_destroys_descendants() {
    let mut world = World::new();
    let root = spawn(&mut world, "Root", Vec2::zeros());
    let parent = spawn(&mut world, "Parent", Vec2::zeros());
    let child = spawn(&mut world, "Child", Vec2::zeros());
    let grandchild = spawn(&mut world, "Grandchild", Vec2::zeros());
    let sibling = spawn(&mut world, "Sibling", Vec2::zeros());
    world.add_root_node(root);
    world.add_child_node(parent, root);
    world.add_child_node(child, parent);
    world.add_child_node(grandchild, child);
    world.add_child_node(sibling, root);

    world.queue_destroy_entity(parent);
    let destroyed = world.destroy_queued_entities();
    assert_eq!(destroyed, vec![parent, child, grandchild]);

    for entity in [parent, child, grandchild] {
        assert!(!world.is_alive(entity));
        assert!(!world.current_scene().is_node_in_scene(entity));
        assert!(!world.has_component::<SceneComponent>(entity));
    }
    assert_eq!(world.current_scene().children_of(root), &[sibling]);
    assert_eq!(world.current_scene().len(), 2);
}

#[test]
fn test_collision_by_tag() {
    let mut world = World::new();
    systems::register_builtin_systems(&mut world, &EngineConfig::default());
    let size = Vec2::new(10.0, 10.0);
    let player = spawn_collider(&mut world, "Player", Vec2::zeros(), size);
    let coin = spawn_collider(&mut world, "Coin", Vec2::new(2.0, 2.0), size);
    let spike = spawn_collider(&mut world, "Spike", Vec2::new(4.0, 4.0), size);
    world.set_entity_tags(coin, ["pickup"]);
    world.set_entity_tags(spike, ["hazard"]);

    let pickups = entity_collision_result_by_tag(&world, player, "pickup");
    assert_eq!(pickups.collided, vec![coin]);
    let hazards = entity_collision_result_by_tag(&world, player, "hazard");
    assert_eq!(hazards.collided, vec![spike]);

    // Retagging moves the entity between indices
    world.set_entity_tags(spike, ["pickup"]);
    let pickups = entity_collision_result_by_tag(&world, player, "pickup");
    assert_eq!(pickups.collided, vec![coin, spike]);
    assert!(!entity_collision_result_by_tag(&world, player, "hazard").is_colliding());

    // Losing the collider drops the entity from the index
    world.remove_component::<ColliderComponent>(coin);
    let pickups = entity_collision_result_by_tag(&world, player, "pickup");
    assert_eq!(pickups.collided, vec![spike]);
    assert!(!world
        .get_system::<CollisionSystem>()
        .tag_index()
        .has_tag(coin, "pickup"));
}

#[test]
fn test_tag_index_follows_scene_component_writes() {
    let mut world = World::new();
    systems::register_builtin_systems(&mut world, &EngineConfig::default());
    let size = Vec2::new(10.0, 10.0);
    let player = spawn_collider(&mut world, "Player", Vec2::zeros(), size);
    let coin = spawn_collider(&mut world, "Coin", Vec2::new(2.0, 2.0), size);
    world.set_entity_tags(coin, ["pickup"]);

    // Read, change, write back
    let mut scene = world.get_component::<SceneComponent>(coin).clone();
    scene.tags = vec!["hazard".to_string()];
    world.update_component(coin, scene);
    let tags = world.get_system::<CollisionSystem>().tag_index();
    assert!(!tags.has_tag(coin, "pickup"));
    assert!(tags.has_tag(coin, "hazard"));

    world.set_entity_tags(coin, ["pickup"]);
    world.remove_component::<SceneComponent>(coin);
    assert!(!world
        .get_system::<CollisionSystem>()
        .tag_index()
        .has_tag(coin, "pickup"));
    assert!(!entity_collision_result_by_tag(&world, player, "pickup").is_colliding());

    world.queue_destroy_entity(coin);
    world.destroy_queued_entities();
    let fresh = spawn_collider(&mut world, "Fresh", Vec2::new(2.0, 2.0), size);
    assert_eq!(fresh, coin);
    assert!(!entity_collision_result_by_tag(&world, player, "pickup").is_colliding());
    assert_eq!(world.get_system::<CollisionSystem>().tag_index().tag_count(), 0);
}
