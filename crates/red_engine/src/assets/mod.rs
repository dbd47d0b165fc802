//! Asset management
//!
//! The engine core never decodes assets itself. It keeps an [`AssetCache`]
//! that maps asset paths to opaque handles, and components store those handles.

pub mod cache;

pub use cache::{AssetCache, Font, Texture};

use crate::foundation::collections::TypedHandle;

/// Asset handle type
pub type AssetHandle<T> = TypedHandle<T>;

/// Handle to a loaded [`Texture`]
pub type TextureHandle = AssetHandle<Texture>;

/// Handle to a loaded [`Font`]
pub type FontHandle = AssetHandle<Font>;
