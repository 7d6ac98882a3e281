/// Failure to construct a texture.
///
/// A texture either exists fully uploaded or not at all, every variant here
/// means nothing was registered.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("texture {name:?} declares {mip_levels} mip levels, expected exactly 1")]
    InvariantViolation { name: String, mip_levels: u32 },

    #[error("texture {name:?} uses unsupported image format tag {tag}")]
    UnsupportedFormat { name: String, tag: u32 },

    #[error("could not decode image: {0}")]
    Decode(#[from] CodecError),

    #[error("graphics backend failure: {0}")]
    Backend(#[from] BackendError),
}

/// Errors produced while decoding image payloads
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("unsupported channel count {0}")]
    UnsupportedChannels(u8),
}

/// Errors reported by a [`crate::render::GraphicsBackend`]
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("invalid texture extent {width}x{height}")]
    InvalidExtent { width: u32, height: u32 },

    #[error("upload holds {actual} bytes, expected {expected}")]
    DataSize { expected: usize, actual: usize },

    #[error("could not allocate texture: {0}")]
    Allocation(String),
}
