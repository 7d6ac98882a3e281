use rustc_hash::FxHashMap;

use crate::render::{GraphicsBackend, Texture};

/// Registry of constructed textures keyed by name.
///
/// Holds only textures that were fully built and uploaded.
pub struct TextureCache<B: GraphicsBackend> {
    textures: FxHashMap<String, Texture<B>>,
}

impl<B: GraphicsBackend> Default for TextureCache<B> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<B: GraphicsBackend> TextureCache<B> {
    pub fn empty() -> Self {
        Self {
            textures: FxHashMap::default(),
        }
    }

    /// Register `texture`, a texture with the same name is released
    pub fn insert(&mut self, texture: Texture<B>) -> &Texture<B> {
        let name = texture.name().to_string();
        if self.textures.contains_key(&name) {
            tracing::info!("Replace cached texture {:?}", name);
        }
        self.textures.insert(name.clone(), texture);
        &self.textures[&name]
    }

    pub fn get(&self, name: &str) -> Option<&Texture<B>> {
        self.textures.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    /// Unregister `name`, the caller takes over the texture
    pub fn remove(&mut self, name: &str) -> Option<Texture<B>> {
        self.textures.remove(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.textures.keys().map(String::as_str)
    }

    /// Release every texture
    pub fn clear(&mut self) {
        self.textures.clear();
    }
}
