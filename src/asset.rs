//
// Asset metadata
//
// Produced by the scene container reader, consumed once by the loader.
//

use crate::TextureError;

/// Image encodings understood by the texture pipeline.
///
/// Tags come from the container as raw integers, convert with [`ImageFormat::from_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ImageFormat {
    Png = 1,
}

impl ImageFormat {
    pub fn tag(self) -> u32 {
        self as u32
    }

    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            1 => Some(Self::Png),
            _ => None,
        }
    }

    /// Resolve the tag of the asset called `name`
    pub(crate) fn resolve(name: &str, tag: u32) -> Result<Self, TextureError> {
        Self::from_tag(tag).ok_or_else(|| TextureError::UnsupportedFormat {
            name: name.to_string(),
            tag,
        })
    }
}

/// Single image texture
#[derive(Debug, Clone)]
pub struct TextureAsset {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
    pub format: u32,
    pub data: Vec<u8>,
}

impl TextureAsset {
    pub fn new(name: impl Into<String>, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            mip_levels: 1,
            format: ImageFormat::Png.tag(),
            data,
        }
    }

    pub fn with_mip_levels(mut self, value: u32) -> Self {
        self.mip_levels = value;
        self
    }

    pub fn with_format(mut self, tag: u32) -> Self {
        self.format = tag;
        self
    }
}

/// One bordered sub image of a sprite sheet
#[derive(Debug, Clone)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub format: u32,
    pub data: Vec<u8>,
}

impl SpriteImage {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format: ImageFormat::Png.tag(),
            data,
        }
    }

    pub fn with_format(mut self, tag: u32) -> Self {
        self.format = tag;
        self
    }
}

/// Sprite sheet, `images` are in placement order
#[derive(Debug, Clone)]
pub struct SpriteAsset {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub images: Vec<SpriteImage>,
}

impl SpriteAsset {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            images: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: SpriteImage) -> Self {
        self.images.push(image);
        self
    }
}
