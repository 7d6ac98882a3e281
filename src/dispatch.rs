//
// Format dispatch
//
// Single image textures: validate the asset, decode it and pick the sized
// pixel format it is uploaded with.
//

use crate::{
    asset::{ImageFormat, TextureAsset},
    codec::{DecodedImage, ImageCodec},
    render::PixelFormat,
    TextureError,
};

/// Decoded pixels tagged with the format they are uploaded in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadImage {
    pub image: DecodedImage,
    pub format: PixelFormat,
}

/// Validate, decode and select the upload encoding of `asset`.
///
/// Fails with [`TextureError::InvariantViolation`] unless exactly one mip level is
/// declared (the chain is generated after upload instead) and with
/// [`TextureError::UnsupportedFormat`] for unknown format tags.
pub fn dispatch<C: ImageCodec>(
    codec: &C,
    asset: &TextureAsset,
) -> Result<UploadImage, TextureError> {
    if asset.mip_levels != 1 {
        return Err(TextureError::InvariantViolation {
            name: asset.name.clone(),
            mip_levels: asset.mip_levels,
        });
    }

    let image = match ImageFormat::resolve(&asset.name, asset.format)? {
        ImageFormat::Png => codec.decode(&asset.data)?,
    };

    if (image.width(), image.height()) != (asset.width, asset.height) {
        tracing::warn!(
            "texture {:?} declares {}x{} but decodes to {}x{}, using decoded size",
            asset.name,
            asset.width,
            asset.height,
            image.width(),
            image.height()
        );
    }

    let format = PixelFormat::from_channels(image.channels());
    Ok(UploadImage { image, format })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{tests::solid_png, ChannelCount, PngCodec};
    use crate::CodecError;
    use std::cell::Cell;

    /// Codec that counts calls and always fails
    #[derive(Default)]
    struct CountingCodec {
        calls: Cell<u32>,
    }

    impl ImageCodec for CountingCodec {
        fn decode(&self, _bytes: &[u8]) -> Result<DecodedImage, CodecError> {
            self.calls.set(self.calls.get() + 1);
            Err(CodecError::UnsupportedChannels(0))
        }
    }

    #[test]
    fn rgba_selects_alpha_format() {
        let asset = TextureAsset::new("glass", 2, 2, solid_png(2, 2, &[1, 2, 3, 4]));

        let upload = dispatch(&PngCodec, &asset).unwrap();

        assert_eq!(upload.format, PixelFormat::Rgba8);
        assert_eq!(upload.image.channels(), ChannelCount::Rgba);
        assert_eq!(upload.image.pixels(), [1u8, 2, 3, 4].repeat(4).as_slice());
    }

    #[test]
    fn rgb_selects_three_channel_format() {
        let asset = TextureAsset::new("brick", 3, 1, solid_png(3, 1, &[9, 8, 7]));

        let upload = dispatch(&PngCodec, &asset).unwrap();

        assert_eq!(upload.format, PixelFormat::Rgb8);
        assert_eq!(upload.image.pixels().len(), 9);
    }

    #[test]
    fn mip_count_other_than_one_is_an_invariant_violation() {
        for mip_levels in [0, 2, 10] {
            let codec = CountingCodec::default();
            let asset = TextureAsset::new("road", 2, 2, Vec::new()).with_mip_levels(mip_levels);

            let err = dispatch(&codec, &asset).unwrap_err();

            assert!(matches!(
                err,
                TextureError::InvariantViolation { mip_levels: m, .. } if m == mip_levels
            ));
            assert_eq!(codec.calls.get(), 0);
        }
    }

    #[test]
    fn unknown_format_tag_is_rejected_before_decoding() {
        let codec = CountingCodec::default();
        let asset = TextureAsset::new("road", 2, 2, Vec::new()).with_format(2);

        let err = dispatch(&codec, &asset).unwrap_err();

        assert!(matches!(err, TextureError::UnsupportedFormat { tag: 2, .. }));
        assert_eq!(codec.calls.get(), 0);
    }

    #[test]
    fn decode_failures_propagate() {
        let codec = CountingCodec::default();
        let asset = TextureAsset::new("road", 2, 2, vec![1, 2, 3]);

        let err = dispatch(&codec, &asset).unwrap_err();

        assert!(matches!(err, TextureError::Decode(_)));
        assert_eq!(codec.calls.get(), 1);
    }

    #[test]
    fn decoded_size_wins_over_declared_size() {
        let asset = TextureAsset::new("sign", 8, 8, solid_png(2, 4, &[0, 0, 0, 255]));

        let upload = dispatch(&PngCodec, &asset).unwrap();

        assert_eq!((upload.image.width(), upload.image.height()), (2, 4));
    }
}
