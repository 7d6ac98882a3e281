use crate::{
    asset::{ImageFormat, SpriteAsset, TextureAsset},
    atlas::{pack, AtlasTarget, SpriteTile},
    codec::{ImageCodec, PngCodec},
    dispatch::{dispatch, UploadImage},
    render::{GraphicsBackend, PixelFormat, Texture, TextureBuilder},
    TextureCache, TextureConfig, TextureError,
};

//
// Texture construction
//

impl<B: GraphicsBackend> Texture<B> {
    /// Build a texture from a single image asset
    pub fn from_asset<C: ImageCodec>(
        backend: &B,
        codec: &C,
        config: &TextureConfig,
        asset: &TextureAsset,
    ) -> Result<Self, TextureError> {
        let UploadImage { image, format } = dispatch(codec, asset)?;

        let handle = TextureBuilder::new(image.width(), image.height(), image.pixels())
            .label(asset.name.as_str())
            .format(format)
            .generate_mipmaps(config.generate_mipmaps)
            .sampler(config.sampler.clone())
            .build(backend)?;

        tracing::info!("Create texture {:?} ({:?})", asset.name, format);
        Ok(Texture::new(asset.name.as_str(), handle).with_default_slot(config.default_slot))
    }

    /// Build an RGBA atlas texture from the sub images of a sprite sheet
    pub fn from_sprite<C: ImageCodec>(
        backend: &B,
        codec: &C,
        config: &TextureConfig,
        sprite: &SpriteAsset,
    ) -> Result<Self, TextureError> {
        let target = AtlasTarget::new(sprite.width, sprite.height);
        target.validate()?;

        let tiles = decode_tiles(codec, sprite)?;
        let pixels = pack(target, &tiles)?;

        let handle = TextureBuilder::new(target.width, target.height, &pixels)
            .label(sprite.name.as_str())
            .format(PixelFormat::Rgba8)
            .generate_mipmaps(config.generate_mipmaps)
            .sampler(config.sampler.clone())
            .build(backend)?;

        tracing::info!(
            "Create sprite texture {:?} from {} tiles",
            sprite.name,
            tiles.len()
        );
        Ok(Texture::new(sprite.name.as_str(), handle).with_default_slot(config.default_slot))
    }
}

/// Decode the sub images of `sprite` in placement order
pub fn decode_tiles<C: ImageCodec>(
    codec: &C,
    sprite: &SpriteAsset,
) -> Result<Vec<SpriteTile>, TextureError> {
    sprite
        .images
        .iter()
        .enumerate()
        .map(|(index, image)| -> Result<SpriteTile, TextureError> {
            let decoded = match ImageFormat::resolve(&sprite.name, image.format)? {
                ImageFormat::Png => codec.decode(&image.data)?,
            };

            if (decoded.width(), decoded.height()) != (image.width, image.height) {
                tracing::warn!(
                    "sprite {:?} tile {} declares {}x{} but decodes to {}x{}, using decoded size",
                    sprite.name,
                    index,
                    image.width,
                    image.height,
                    decoded.width(),
                    decoded.height()
                );
            }
            Ok(SpriteTile::new(decoded))
        })
        .collect()
}

//
// Loader
//

/// Builds textures from scene assets and registers the ones that succeed.
///
/// Runs on the thread owning the graphics context of `B`.
pub struct TextureLoader<B: GraphicsBackend, C: ImageCodec = PngCodec> {
    backend: B,
    codec: C,
    config: TextureConfig,
    cache: TextureCache<B>,
}

impl<B: GraphicsBackend> TextureLoader<B, PngCodec> {
    pub fn new(backend: B, config: TextureConfig) -> Self {
        Self::with_codec(backend, PngCodec, config)
    }
}

impl<B: GraphicsBackend, C: ImageCodec> TextureLoader<B, C> {
    pub fn with_codec(backend: B, codec: C, config: TextureConfig) -> Self {
        Self {
            backend,
            codec,
            config,
            cache: TextureCache::empty(),
        }
    }

    pub fn load_texture(&mut self, asset: &TextureAsset) -> Result<&Texture<B>, TextureError> {
        let texture = Texture::from_asset(&self.backend, &self.codec, &self.config, asset)?;
        Ok(self.cache.insert(texture))
    }

    pub fn load_sprite(&mut self, sprite: &SpriteAsset) -> Result<&Texture<B>, TextureError> {
        let texture = Texture::from_sprite(&self.backend, &self.codec, &self.config, sprite)?;
        Ok(self.cache.insert(texture))
    }

    pub fn get(&self, name: &str) -> Option<&Texture<B>> {
        self.cache.get(name)
    }

    pub fn cache(&self) -> &TextureCache<B> {
        &self.cache
    }
    pub fn cache_mut(&mut self) -> &mut TextureCache<B> {
        &mut self.cache
    }
    pub fn backend(&self) -> &B {
        &self.backend
    }
    pub fn config(&self) -> &TextureConfig {
        &self.config
    }
}
