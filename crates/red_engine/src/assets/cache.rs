//! Asset cache
//!
//! Path-keyed registry of textures and fonts. Each asset is stored once in a
//! slot map and handed out as a typed handle; asking for the same path again
//! returns the existing handle.

use std::collections::HashMap;

use super::{FontHandle, TextureHandle};
use crate::foundation::collections::HandleMap;

/// Texture known to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Path the texture was loaded from
    pub path: String,
}

/// Font known to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    /// Identifier scenes refer to the font by
    pub uid: String,
    /// Path the font was loaded from
    pub path: String,
    /// Point size
    pub size: u32,
}

/// Registry of loaded assets
#[derive(Debug, Default)]
pub struct AssetCache {
    textures: HandleMap<Texture>,
    texture_paths: HashMap<String, TextureHandle>,
    fonts: HandleMap<Font>,
    font_uids: HashMap<String, FontHandle>,
}

impl AssetCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the texture at `path`
    pub fn load_texture(&mut self, path: &str) -> TextureHandle {
        if let Some(&handle) = self.texture_paths.get(path) {
            log::warn!("Texture '{path}' is already loaded!");
            return handle;
        }
        let handle = TextureHandle::new(self.textures.insert(Texture {
            path: path.to_string(),
        }));
        self.texture_paths.insert(path.to_string(), handle);
        log::debug!("Loaded texture '{path}'");
        handle
    }

    /// Register the font at `path` under `uid`
    pub fn load_font(&mut self, uid: &str, path: &str, size: u32) -> FontHandle {
        if let Some(&handle) = self.font_uids.get(uid) {
            log::warn!("Font '{uid}' is already loaded!");
            return handle;
        }
        let handle = FontHandle::new(self.fonts.insert(Font {
            uid: uid.to_string(),
            path: path.to_string(),
            size,
        }));
        self.font_uids.insert(uid.to_string(), handle);
        log::debug!("Loaded font '{uid}' from '{path}' at size {size}");
        handle
    }

    /// Handle of a loaded texture
    pub fn texture(&self, path: &str) -> Option<TextureHandle> {
        self.texture_paths.get(path).copied()
    }

    /// Handle of a loaded font
    pub fn font(&self, uid: &str) -> Option<FontHandle> {
        self.font_uids.get(uid).copied()
    }

    /// Data behind a texture handle
    pub fn texture_data(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(handle.key())
    }

    /// Data behind a font handle
    pub fn font_data(&self, handle: FontHandle) -> Option<&Font> {
        self.fonts.get(handle.key())
    }

    /// Number of loaded textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of loaded fonts
    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reloading_texture_returns_same_handle() {
        let mut cache = AssetCache::new();
        let first = cache.load_texture("assets/ship.png");
        let second = cache.load_texture("assets/ship.png");

        assert_eq!(first, second);
        assert_eq!(cache.texture_count(), 1);
        assert_eq!(cache.texture("assets/ship.png"), Some(first));
        assert_eq!(cache.texture_data(first).map(|t| t.path.as_str()), Some("assets/ship.png"));
    }

    #[test]
    fn test_fonts_are_keyed_by_uid() {
        let mut cache = AssetCache::new();
        let small = cache.load_font("small", "fonts/verdana.ttf", 12);
        let large = cache.load_font("large", "fonts/verdana.ttf", 32);

        assert_ne!(small, large);
        assert_eq!(cache.font("large"), Some(large));
        assert_eq!(cache.font_data(small).map(|f| f.size), Some(12));
        assert!(cache.font("missing").is_none());
    }
}
