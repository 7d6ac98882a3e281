use crate::CodecError;

/// Channel layout of a decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelCount {
    Rgb,
    Rgba,
}

impl ChannelCount {
    pub fn count(self) -> usize {
        match self {
            ChannelCount::Rgb => 3,
            ChannelCount::Rgba => 4,
        }
    }

    pub fn from_count(count: u8) -> Result<Self, CodecError> {
        match count {
            3 => Ok(ChannelCount::Rgb),
            4 => Ok(ChannelCount::Rgba),
            n => Err(CodecError::UnsupportedChannels(n)),
        }
    }
}

/// Row major, top to bottom pixel buffer
///
/// `pixels.len() == width * height * channels` holds for every value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    channels: ChannelCount,
    pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn new(
        width: u32,
        height: u32,
        channels: ChannelCount,
        pixels: Vec<u8>,
    ) -> Result<Self, CodecError> {
        let expected = width as usize * height as usize * channels.count();
        if pixels.len() != expected {
            return Err(CodecError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    /// Image filled with a single color
    pub fn filled(width: u32, height: u32, color: &[u8]) -> Result<Self, CodecError> {
        let channels = ChannelCount::from_count(color.len() as u8)?;
        let pixels = color.repeat(width as usize * height as usize);
        Self::new(width, height, channels, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn channels(&self) -> ChannelCount {
        self.channels
    }
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Bytes of row `row`
    pub fn row(&self, row: u32) -> &[u8] {
        let stride = self.width as usize * self.channels.count();
        let start = row as usize * stride;
        &self.pixels[start..start + stride]
    }
}

/// Copy RGB pixels into an RGBA buffer with opaque alpha
pub(crate) fn widen_rgb_into(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
        d[..3].copy_from_slice(s);
        d[3] = u8::MAX;
    }
}

/// Turns compressed payloads into pixels.
///
/// Malformed payloads are reported as [`CodecError`], the pipeline does not retry.
pub trait ImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, CodecError>;
}

/// PNG decoding through the `image` crate.
///
/// Images with an alpha channel decode to RGBA, everything else to RGB.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, CodecError> {
        let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?;
        let (width, height) = (img.width(), img.height());

        if img.color().has_alpha() {
            DecodedImage::new(width, height, ChannelCount::Rgba, img.to_rgba8().into_raw())
        } else {
            DecodedImage::new(width, height, ChannelCount::Rgb, img.to_rgb8().into_raw())
        }
    }
}
