use crate::{
    render::{full_mip_chain, GraphicsBackend, PixelFormat, SamplerBuilder, TextureDescriptor},
    BackendError,
};
use glam::UVec2;

//
// Texture builder
//

/// Describes one upload: base level pixels, storage format, mip chain and sampling.
#[derive(Debug, Clone)]
pub struct TextureBuilder<'a> {
    width: u32,
    height: u32,
    bytes: &'a [u8],

    label: Option<String>,
    format: PixelFormat,
    generate_mipmaps: bool,
    sampler: SamplerBuilder,
}

impl<'a> TextureBuilder<'a> {
    pub fn new(width: u32, height: u32, bytes: &'a [u8]) -> Self {
        Self {
            width,
            height,
            bytes,
            label: None,
            format: PixelFormat::Rgba8,
            generate_mipmaps: true,
            sampler: SamplerBuilder::new(),
        }
    }

    /// Allocate, upload, fill the mip chain and apply sampling as one step.
    ///
    /// Nothing stays allocated on error.
    pub fn build<B: GraphicsBackend>(
        &self,
        backend: &B,
    ) -> Result<GpuTextureHandle<B>, BackendError> {
        if self.width == 0 || self.height == 0 {
            return Err(BackendError::InvalidExtent {
                width: self.width,
                height: self.height,
            });
        }

        let mip_level_count = if self.generate_mipmaps {
            full_mip_chain(self.width, self.height)
        } else {
            1
        };
        let desc = TextureDescriptor {
            label: self.label.as_deref().unwrap_or("texture"),
            width: self.width,
            height: self.height,
            format: self.format,
            mip_level_count,
        };

        let expected = desc.base_level_size();
        if self.bytes.len() != expected {
            return Err(BackendError::DataSize {
                expected,
                actual: self.bytes.len(),
            });
        }

        let raw = backend.create_texture(&desc)?;
        let mut handle = GpuTextureHandle {
            backend: backend.clone(),
            raw: Some(raw),
            width: self.width,
            height: self.height,
            format: self.format,
            mip_level_count,
        };

        if let Some(raw) = handle.raw.as_mut() {
            backend.write_base_level(raw, &desc, self.bytes);
            if mip_level_count > 1 {
                backend.generate_mipmaps(raw);
            }
            backend.set_sampler(raw, &self.sampler);
        }

        tracing::debug!(
            "Uploaded {} ({}x{}, {:?}, {} mips)",
            desc.label,
            self.width,
            self.height,
            self.format,
            mip_level_count
        );

        Ok(handle)
    }
}

impl TextureBuilder<'_> {
    pub fn label(mut self, value: impl Into<String>) -> Self {
        self.label = Some(value.into());
        self
    }
    pub fn format(mut self, value: PixelFormat) -> Self {
        self.format = value;
        self
    }
    pub fn generate_mipmaps(mut self, value: bool) -> Self {
        self.generate_mipmaps = value;
        self
    }
    pub fn sampler(mut self, value: SamplerBuilder) -> Self {
        self.sampler = value;
        self
    }
}

//
// GPU texture handle
//

/// Owns exactly one backend texture.
///
/// The resource is released once, on [`GpuTextureHandle::destroy`] or drop,
/// whichever comes first.
pub struct GpuTextureHandle<B: GraphicsBackend> {
    backend: B,
    raw: Option<B::Texture>,

    width: u32,
    height: u32,
    format: PixelFormat,
    mip_level_count: u32,
}

impl<B: GraphicsBackend> GpuTextureHandle<B> {
    pub fn bind(&self, slot: u32) {
        match &self.raw {
            Some(raw) => self.backend.bind(raw, slot),
            None => tracing::warn!("binding destroyed texture to slot {} -> skipping", slot),
        }
    }

    /// Release the backend resource, no-op when already released
    pub fn destroy(&mut self) {
        if let Some(raw) = self.raw.take() {
            self.backend.destroy(raw);
        }
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_none()
    }
    pub fn raw(&self) -> Option<&B::Texture> {
        self.raw.as_ref()
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn format(&self) -> PixelFormat {
        self.format
    }
    pub fn mip_level_count(&self) -> u32 {
        self.mip_level_count
    }
}

impl<B: GraphicsBackend> Drop for GpuTextureHandle<B> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<B: GraphicsBackend> std::fmt::Debug for GpuTextureHandle<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuTextureHandle")
            .field("null", &self.is_null())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("mip_level_count", &self.mip_level_count)
            .finish()
    }
}

//
// Texture
//

/// Named, GPU resident texture built from a scene asset
#[derive(Debug)]
pub struct Texture<B: GraphicsBackend> {
    name: String,
    width: u32,
    height: u32,
    handle: GpuTextureHandle<B>,

    default_slot: u32,
}

impl<B: GraphicsBackend> Texture<B> {
    pub fn new(name: impl Into<String>, handle: GpuTextureHandle<B>) -> Self {
        Self {
            name: name.into(),
            width: handle.width(),
            height: handle.height(),
            handle,
            default_slot: 0,
        }
    }

    pub fn with_default_slot(mut self, slot: u32) -> Self {
        self.default_slot = slot;
        self
    }

    /// Bind to the default slot
    pub fn bind(&self) {
        self.handle.bind(self.default_slot);
    }

    pub fn bind_slot(&self, slot: u32) {
        self.handle.bind(slot);
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn dimensions(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }
    pub fn handle(&self) -> &GpuTextureHandle<B> {
        &self.handle
    }
}
