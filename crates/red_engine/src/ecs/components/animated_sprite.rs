//! Animated sprite component
//!
//! A set of named frame sequences. Playback time is advanced by the
//! animated sprite rendering system; the frame shown is derived from the
//! time spent in the current animation.

use std::collections::HashMap;

use crate::assets::TextureHandle;
use crate::ecs::Component;
use crate::foundation::math::Rect2;
use crate::render::Color;

/// Single frame of an [`Animation`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationFrame {
    /// Texture to sample; the frame is skipped while `None`
    pub texture: Option<TextureHandle>,
    /// Region of the texture to draw, in pixels
    pub draw_source: Rect2,
}

impl AnimationFrame {
    /// Frame drawing `draw_source` of `texture`
    pub fn new(texture: TextureHandle, draw_source: Rect2) -> Self {
        Self {
            texture: Some(texture),
            draw_source,
        }
    }
}

/// Named frame sequence played at a fixed rate
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// Name used to select the animation
    pub name: String,
    /// Seconds each frame stays on screen
    pub frame_time: f32,
    /// Frames in playback order
    pub frames: Vec<AnimationFrame>,
}

impl Animation {
    /// Animation called `name` showing each frame for `frame_time` seconds
    pub fn new(name: impl Into<String>, frame_time: f32, frames: Vec<AnimationFrame>) -> Self {
        Self {
            name: name.into(),
            frame_time,
            frames,
        }
    }

    /// Index of the frame shown `elapsed` seconds into playback, looping
    pub fn frame_index_at(&self, elapsed: f32) -> usize {
        if self.frames.is_empty() || self.frame_time <= 0.0 {
            return 0;
        }
        // Truncation is the intent: whole frames elapsed
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let frames_elapsed = (elapsed.max(0.0) / self.frame_time) as usize;
        frames_elapsed % self.frames.len()
    }
}

/// Sprite cycling through the frames of its current animation
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedSpriteComponent {
    animations: HashMap<String, Animation>,
    current_animation: String,
    elapsed: f32,
    /// Whether playback time advances
    pub is_playing: bool,
    /// Mirror horizontally
    pub flip_x: bool,
    /// Mirror vertically
    pub flip_y: bool,
    /// Tint multiplied with the texture
    pub modulate: Color,
}

impl Component for AnimatedSpriteComponent {}

impl Default for AnimatedSpriteComponent {
    fn default() -> Self {
        Self {
            animations: HashMap::new(),
            current_animation: String::new(),
            elapsed: 0.0,
            is_playing: false,
            flip_x: false,
            flip_y: false,
            modulate: Color::WHITE,
        }
    }
}

impl AnimatedSpriteComponent {
    /// Sprite holding `animations`, stopped on `current_animation`
    ///
    /// # Panics
    ///
    /// Panics if no animation is called `current_animation`.
    pub fn new(animations: impl IntoIterator<Item = Animation>, current_animation: &str) -> Self {
        let animations: HashMap<String, Animation> = animations
            .into_iter()
            .map(|animation| (animation.name.clone(), animation))
            .collect();
        assert!(
            animations.contains_key(current_animation),
            "Animation '{current_animation}' is not defined"
        );
        Self {
            animations,
            current_animation: current_animation.to_string(),
            ..Self::default()
        }
    }

    /// Builder pattern: start playing
    pub fn playing(mut self) -> Self {
        self.is_playing = true;
        self
    }

    /// Builder pattern: set mirroring
    pub fn with_flip(mut self, flip_x: bool, flip_y: bool) -> Self {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
        self
    }

    /// Builder pattern: set the tint
    pub fn with_modulate(mut self, modulate: Color) -> Self {
        self.modulate = modulate;
        self
    }

    /// Animation being shown
    pub fn current_animation(&self) -> Option<&Animation> {
        self.animations.get(&self.current_animation)
    }

    /// Name of the animation being shown
    pub fn current_animation_name(&self) -> &str {
        &self.current_animation
    }

    /// Whether an animation is called `name`
    pub fn has_animation(&self, name: &str) -> bool {
        self.animations.contains_key(name)
    }

    /// Seconds played in the current animation
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Index of the frame being shown
    pub fn current_frame_index(&self) -> usize {
        self.current_animation()
            .map_or(0, |animation| animation.frame_index_at(self.elapsed))
    }

    /// Frame being shown, if the current animation has any
    pub fn current_frame(&self) -> Option<&AnimationFrame> {
        self.current_animation()
            .and_then(|animation| animation.frames.get(animation.frame_index_at(self.elapsed)))
    }

    /// Advance playback by `delta_time` seconds while playing
    pub fn advance(&mut self, delta_time: f32) {
        if self.is_playing {
            self.elapsed += delta_time;
        }
    }

    /// Switch to `name`, restarting from its first frame
    ///
    /// Selecting the current animation or an unknown one changes nothing.
    /// Switching leaves the sprite playing only when `play` is set.
    pub fn set_animation(&mut self, name: &str, play: bool) {
        if !self.animations.contains_key(name) {
            log::warn!("Animation '{name}' is not defined");
            return;
        }
        if self.current_animation == name {
            return;
        }
        self.current_animation = name.to_string();
        self.elapsed = 0.0;
        self.is_playing = play;
    }

    /// Switch to `name` and play it; keeps playing if it is already current
    pub fn play(&mut self, name: &str) {
        self.set_animation(name, true);
        if self.current_animation == name {
            self.is_playing = true;
        }
    }

    /// Freeze on the frame being shown
    pub fn stop(&mut self) {
        self.is_playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetCache;
    use approx::assert_relative_eq;

    fn walk_cycle() -> AnimatedSpriteComponent {
        let mut assets = AssetCache::new();
        let sheet = assets.load_texture("player.png");
        let frames = (0..4u8)
            .map(|i| AnimationFrame::new(sheet, Rect2::new(f32::from(i) * 16.0, 0.0, 16.0, 16.0)))
            .collect();
        let idle = Animation::new("idle", 0.5, vec![AnimationFrame::new(sheet, Rect2::new(0.0, 16.0, 16.0, 16.0))]);
        AnimatedSpriteComponent::new([Animation::new("walk", 0.1, frames), idle], "walk")
    }

    #[test]
    fn test_frames_advance_with_delta_time() {
        let mut sprite = walk_cycle();
        sprite.advance(0.25);
        assert_eq!(sprite.current_frame_index(), 0, "a stopped sprite holds its frame");

        sprite.play("walk");
        sprite.advance(0.25);
        assert_eq!(sprite.current_frame_index(), 2);
        assert_relative_eq!(sprite.current_frame().unwrap().draw_source.x, 32.0);

        // Wraps after the last frame
        sprite.advance(0.2);
        assert_eq!(sprite.current_frame_index(), 0);

        sprite.stop();
        sprite.advance(1.0);
        assert_eq!(sprite.current_frame_index(), 0);
    }

    #[test]
    fn test_switching_animation_restarts_playback() {
        let mut sprite = walk_cycle().playing();
        sprite.advance(0.15);
        assert_eq!(sprite.current_frame_index(), 1);

        // Reselecting the current animation keeps its progress
        sprite.play("walk");
        assert_eq!(sprite.current_frame_index(), 1);

        sprite.set_animation("idle", false);
        assert_eq!(sprite.current_animation_name(), "idle");
        assert_relative_eq!(sprite.elapsed(), 0.0);
        assert!(!sprite.is_playing);

        sprite.set_animation("jump", true);
        assert_eq!(sprite.current_animation_name(), "idle");
        assert!(!sprite.is_playing);
    }

    #[test]
    fn test_degenerate_animations_stay_on_first_frame() {
        let empty = Animation::new("empty", 0.1, Vec::new());
        assert_eq!(empty.frame_index_at(3.0), 0);
        let sprite = AnimatedSpriteComponent::new([empty], "empty").playing();
        assert!(sprite.current_frame().is_none());

        let frozen = Animation::new("frozen", 0.0, vec![AnimationFrame::default(); 3]);
        assert_eq!(frozen.frame_index_at(10.0), 0);
    }

    #[test]
    #[should_panic(expected = "not defined")]
    fn test_unknown_initial_animation_panics() {
        AnimatedSpriteComponent::new([Animation::new("idle", 0.1, Vec::new())], "run");
    }
}
