//! Rendering systems
//!
//! Translate sprite, animated sprite and text label entities to screen space
//! and submit draw commands. Entities whose [`SceneComponent`] is hidden are
//! skipped.

use crate::ecs::components::{
    AnimatedSpriteComponent, SceneComponent, SpriteComponent, TextLabelComponent,
    Transform2DComponent,
};
use crate::ecs::system::{System, SystemContext, SystemHooks};
use crate::ecs::{ComponentSignature, Entity, World};
use crate::foundation::math::Rect2;
use crate::render::DrawCommand;

fn is_hidden(ctx: &SystemContext<'_>, entity: Entity) -> bool {
    ctx.components
        .try_get::<SceneComponent>(entity)
        .is_some_and(|scene| !scene.visible)
}

/// Draws every [`SpriteComponent`]
#[derive(Debug, Default)]
pub struct SpriteRenderingSystem;

impl SpriteRenderingSystem {
    /// Register with `world`, matching transform + sprite entities
    pub fn register(world: &mut World) -> &mut Self {
        let signature = ComponentSignature::from_types(&[
            world.component_type::<Transform2DComponent>(),
            world.component_type::<SpriteComponent>(),
        ]);
        world.register_system(Self, signature, SystemHooks::RENDER)
    }
}

impl System for SpriteRenderingSystem {
    fn on_render(&mut self, ctx: &mut SystemContext<'_>) {
        for entity in ctx.entity_list() {
            if is_hidden(ctx, entity) {
                continue;
            }
            let sprite = ctx.component::<SpriteComponent>(entity);
            let Some(texture) = sprite.texture else {
                continue;
            };
            let screen = ctx.screen_transform(entity);
            let command = DrawCommand::Sprite {
                entity,
                texture,
                source: sprite.draw_source,
                destination: Rect2::new(
                    screen.position.x,
                    screen.position.y,
                    sprite.draw_source.w * screen.scale.x,
                    sprite.draw_source.h * screen.scale.y,
                ),
                rotation: screen.rotation,
                modulate: sprite.modulate,
                flip_x: sprite.flip_x,
                flip_y: sprite.flip_y,
                z_index: screen.z_index,
            };
            ctx.submit(command);
        }
    }
}

/// Plays and draws every [`AnimatedSpriteComponent`]
///
/// Playback advances during update, hidden entities included, so an
/// animation keeps its pace while invisible.
#[derive(Debug, Default)]
pub struct AnimatedSpriteRenderingSystem;

impl AnimatedSpriteRenderingSystem {
    /// Register with `world`, matching transform + animated sprite entities
    pub fn register(world: &mut World) -> &mut Self {
        let signature = ComponentSignature::from_types(&[
            world.component_type::<Transform2DComponent>(),
            world.component_type::<AnimatedSpriteComponent>(),
        ]);
        world.register_system(Self, signature, SystemHooks::UPDATE | SystemHooks::RENDER)
    }
}

impl System for AnimatedSpriteRenderingSystem {
    fn on_update(&mut self, ctx: &mut SystemContext<'_>, delta_time: f32) {
        for entity in ctx.entity_list() {
            ctx.components
                .get_mut::<AnimatedSpriteComponent>(entity)
                .advance(delta_time);
        }
    }

    fn on_render(&mut self, ctx: &mut SystemContext<'_>) {
        for entity in ctx.entity_list() {
            if is_hidden(ctx, entity) {
                continue;
            }
            let sprite = ctx.component::<AnimatedSpriteComponent>(entity);
            let Some(&frame) = sprite.current_frame() else {
                continue;
            };
            let Some(texture) = frame.texture else {
                continue;
            };
            let (modulate, flip_x, flip_y) = (sprite.modulate, sprite.flip_x, sprite.flip_y);
            let screen = ctx.screen_transform(entity);
            ctx.submit(DrawCommand::Sprite {
                entity,
                texture,
                source: frame.draw_source,
                destination: Rect2::new(
                    screen.position.x,
                    screen.position.y,
                    frame.draw_source.w * screen.scale.x,
                    frame.draw_source.h * screen.scale.y,
                ),
                rotation: screen.rotation,
                modulate,
                flip_x,
                flip_y,
                z_index: screen.z_index,
            });
        }
    }
}

/// Draws every [`TextLabelComponent`]
#[derive(Debug, Default)]
pub struct TextRenderingSystem;

impl TextRenderingSystem {
    /// Register with `world`, matching transform + text label entities
    pub fn register(world: &mut World) -> &mut Self {
        let signature = ComponentSignature::from_types(&[
            world.component_type::<Transform2DComponent>(),
            world.component_type::<TextLabelComponent>(),
        ]);
        world.register_system(Self, signature, SystemHooks::RENDER)
    }
}

impl System for TextRenderingSystem {
    fn on_render(&mut self, ctx: &mut SystemContext<'_>) {
        for entity in ctx.entity_list() {
            if is_hidden(ctx, entity) {
                continue;
            }
            let label = ctx.component::<TextLabelComponent>(entity);
            let Some(font) = label.font else {
                continue;
            };
            let screen = ctx.screen_transform(entity);
            let command = DrawCommand::Text {
                entity,
                font,
                text: label.text.clone(),
                position: screen.position,
                scale: screen.scale.x,
                color: label.color,
                z_index: screen.z_index,
            };
            ctx.submit(command);
        }
    }
}
