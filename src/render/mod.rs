mod mipmap;
mod sampler;
mod texture;
mod wgpu_backend;

#[cfg(test)]
pub(crate) mod recording;

pub use sampler::*;
pub use texture::*;
pub use wgpu_backend::*;

use crate::{codec::ChannelCount, BackendError};

/// Sized GPU pixel storage, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    /// Only the channel count decides the format
    pub fn from_channels(channels: ChannelCount) -> Self {
        match channels {
            ChannelCount::Rgb => PixelFormat::Rgb8,
            ChannelCount::Rgba => PixelFormat::Rgba8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDescriptor<'a> {
    pub label: &'a str,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub mip_level_count: u32,
}

impl TextureDescriptor<'_> {
    /// Size in bytes of the base level
    pub fn base_level_size(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }
}

/// Number of levels in a full mip chain down to 1x1
pub fn full_mip_chain(width: u32, height: u32) -> u32 {
    let max_dim = width.max(height);
    (32 - max_dim.leading_zeros()).max(1)
}

/// Graphics context a texture lives in.
///
/// Implementations wrap process wide GPU state. Every call must happen on the
/// thread owning that state; nothing here synchronizes.
pub trait GraphicsBackend: Clone {
    type Texture;

    /// Allocate storage for all mip levels of `desc`
    fn create_texture(&self, desc: &TextureDescriptor<'_>) -> Result<Self::Texture, BackendError>;

    /// Upload `bytes` as mip level 0, tightly packed rows in `desc.format`
    fn write_base_level(
        &self,
        texture: &Self::Texture,
        desc: &TextureDescriptor<'_>,
        bytes: &[u8],
    );

    /// Fill levels 1.. from level 0
    fn generate_mipmaps(&self, texture: &Self::Texture);

    fn set_sampler(&self, texture: &mut Self::Texture, sampler: &SamplerBuilder);

    /// Make `texture` the one sampled through `slot`
    fn bind(&self, texture: &Self::Texture, slot: u32);

    fn destroy(&self, texture: Self::Texture);
}
