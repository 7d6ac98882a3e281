//
// Sprite atlas packing
//
// Tiles are laid out left to right in the order given and wrap onto a new
// shelf once a row is full. Every tile carries a 1 pixel border duplicated
// from its neighbours which is trimmed before copying. Whatever falls outside
// the atlas is clipped silently.
//

use crate::{
    codec::{widen_rgb_into, ChannelCount, DecodedImage},
    BackendError,
};

/// Width of the shared border on every edge of a tile
pub const TILE_BORDER: u32 = 1;

/// Atlases are always RGBA
pub const ATLAS_BYTES_PER_PIXEL: usize = 4;

/// Largest atlas edge accepted, the common GPU texture size limit
pub const MAX_ATLAS_DIMENSION: u32 = 16384;

/// Final atlas dimensions, taken from sprite metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtlasTarget {
    pub width: u32,
    pub height: u32,
}

impl AtlasTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size of the RGBA buffer, `None` on overflow
    pub fn byte_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(ATLAS_BYTES_PER_PIXEL)
    }

    /// Buffer size of a non empty target within [`MAX_ATLAS_DIMENSION`]
    pub fn validate(&self) -> Result<usize, BackendError> {
        let invalid = || BackendError::InvalidExtent {
            width: self.width,
            height: self.height,
        };

        let empty = self.width == 0 || self.height == 0;
        let oversized = self.width > MAX_ATLAS_DIMENSION || self.height > MAX_ATLAS_DIMENSION;
        if empty || oversized {
            return Err(invalid());
        }
        self.byte_len().ok_or_else(invalid)
    }
}

/// Decoded sub image of a sprite sheet, border included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteTile {
    image: DecodedImage,
}

impl SpriteTile {
    pub fn new(image: DecodedImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    /// Size of the interior copied into the atlas, zero for tiles that are all border
    pub fn contribution(&self) -> (u32, u32) {
        (
            self.image.width().saturating_sub(2 * TILE_BORDER),
            self.image.height().saturating_sub(2 * TILE_BORDER),
        )
    }
}

/// Top left insertion point of the next tile
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PackCursor {
    pub row: u32,
    pub column: u32,
}

/// Shelf packer writing trimmed tiles into a zeroed RGBA buffer
#[derive(Debug)]
pub struct AtlasPacker {
    target: AtlasTarget,
    cursor: PackCursor,
    pixels: Vec<u8>,
}

impl AtlasPacker {
    /// Fails with [`BackendError::InvalidExtent`] before allocating for invalid targets
    pub fn new(target: AtlasTarget) -> Result<Self, BackendError> {
        let byte_len = target.validate()?;
        Ok(Self {
            target,
            cursor: PackCursor::default(),
            pixels: vec![0; byte_len],
        })
    }

    pub fn target(&self) -> AtlasTarget {
        self.target
    }

    pub fn cursor(&self) -> PackCursor {
        self.cursor
    }

    /// Copy the interior of `tile` at the cursor and advance it.
    ///
    /// Columns past the right edge and rows past the bottom edge are dropped.
    /// The shelf advances by the height of this tile, rows mixing tile heights
    /// are left for the caller to avoid.
    pub fn place(&mut self, tile: &SpriteTile) {
        let (contrib_w, contrib_h) = tile.contribution();
        let AtlasTarget { width, height } = self.target;
        let PackCursor { row, column } = self.cursor;

        let copy_len = if column.saturating_add(contrib_w) > width {
            width.saturating_sub(column)
        } else {
            contrib_w
        };
        let visible_rows = contrib_h.min(height.saturating_sub(row));

        if copy_len < contrib_w || visible_rows < contrib_h {
            tracing::debug!(
                "clipping {}x{} tile at ({}, {}) to {}x{}",
                contrib_w,
                contrib_h,
                row,
                column,
                copy_len,
                visible_rows
            );
        }

        let image = tile.image();
        let channels = image.channels().count();
        let src_offset = TILE_BORDER as usize * channels;
        let src_len = copy_len as usize * channels;
        let dst_len = copy_len as usize * ATLAS_BYTES_PER_PIXEL;

        for r in 0..visible_rows {
            let src = &image.row(r + TILE_BORDER)[src_offset..src_offset + src_len];

            let dst_pixel = (row + r) as usize * width as usize + column as usize;
            let dst_start = dst_pixel * ATLAS_BYTES_PER_PIXEL;
            let dst = &mut self.pixels[dst_start..dst_start + dst_len];

            match image.channels() {
                ChannelCount::Rgba => dst.copy_from_slice(src),
                ChannelCount::Rgb => widen_rgb_into(src, dst),
            }
        }

        self.cursor.column = column.saturating_add(contrib_w);
        if self.cursor.column >= width {
            self.cursor.column = 0;
            self.cursor.row = row.saturating_add(contrib_h);
        }
    }

    /// Finished atlas, `width * height * 4` bytes
    pub fn finish(self) -> Vec<u8> {
        self.pixels
    }
}

/// Pack `tiles` in order into a fresh atlas
pub fn pack<'a>(
    target: AtlasTarget,
    tiles: impl IntoIterator<Item = &'a SpriteTile>,
) -> Result<Vec<u8>, BackendError> {
    let mut packer = AtlasPacker::new(target)?;
    for tile in tiles {
        packer.place(tile);
    }
    Ok(packer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, value: u8) -> SpriteTile {
        SpriteTile::new(DecodedImage::filled(width, height, &[value; 4]).unwrap())
    }

    /// Tile whose border is 0xEE and whose interior pixel (x, y) is [x, y, id, 0xFF]
    fn bordered(width: u32, height: u32, id: u8) -> SpriteTile {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                if border {
                    pixels.extend_from_slice(&[0xEE; 4]);
                } else {
                    pixels.extend_from_slice(&[(x - 1) as u8, (y - 1) as u8, id, 0xFF]);
                }
            }
        }
        SpriteTile::new(DecodedImage::new(width, height, ChannelCount::Rgba, pixels).unwrap())
    }

    fn pixel(atlas: &[u8], target: AtlasTarget, x: u32, y: u32) -> [u8; 4] {
        let start = (y * target.width + x) as usize * 4;
        atlas[start..start + 4].try_into().unwrap()
    }

    #[test]
    fn two_tiles_fill_the_first_shelf() {
        let target = AtlasTarget::new(4, 4);
        let a = solid(4, 4, 0xFF);
        let b = solid(4, 4, 0x11);

        let mut packer = AtlasPacker::new(target).unwrap();
        packer.place(&a);
        assert_eq!(packer.cursor(), PackCursor { row: 0, column: 2 });
        packer.place(&b);
        assert_eq!(packer.cursor(), PackCursor { row: 2, column: 0 });
        let atlas = packer.finish();

        assert_eq!(atlas.len(), 4 * 4 * 4);
        for y in 0..4 {
            for x in 0..4 {
                let expected = match (x, y) {
                    (0..=1, 0..=1) => [0xFF; 4],
                    (2..=3, 0..=1) => [0x11; 4],
                    _ => [0; 4],
                };
                assert_eq!(pixel(&atlas, target, x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn border_is_trimmed_and_interior_kept() {
        let target = AtlasTarget::new(3, 2);
        let tile = bordered(5, 4, 7);

        let atlas = pack(target, [&tile]).unwrap();

        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(
                    pixel(&atlas, target, x, y),
                    [x as u8, y as u8, 7, 0xFF],
                    "pixel ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn right_edge_is_clipped() {
        let target = AtlasTarget::new(3, 2);
        let first = bordered(4, 4, 1);
        let second = bordered(4, 4, 2);

        let mut packer = AtlasPacker::new(target).unwrap();
        packer.place(&first);
        packer.place(&second);
        // 2 + 2 >= 3 wraps onto the next shelf
        assert_eq!(packer.cursor(), PackCursor { row: 2, column: 0 });
        let atlas = packer.finish();

        assert_eq!(Some(atlas.len()), target.byte_len());
        assert_eq!(pixel(&atlas, target, 1, 1), [1, 1, 1, 0xFF]);
        assert_eq!(pixel(&atlas, target, 2, 0), [0, 0, 2, 0xFF]);
        assert_eq!(pixel(&atlas, target, 2, 1), [0, 1, 2, 0xFF]);
    }

    #[test]
    fn bottom_edge_is_clipped() {
        let target = AtlasTarget::new(2, 2);
        let tall = bordered(4, 6, 3);

        let atlas = pack(target, [&tall]).unwrap();

        assert_eq!(Some(atlas.len()), target.byte_len());
        assert_eq!(pixel(&atlas, target, 0, 0), [0, 0, 3, 0xFF]);
        assert_eq!(pixel(&atlas, target, 1, 1), [1, 1, 3, 0xFF]);
    }

    #[test]
    fn excess_tiles_are_dropped() {
        let target = AtlasTarget::new(2, 2);
        let tiles: Vec<_> = (1..=5).map(|id| bordered(4, 4, id)).collect();

        let mut packer = AtlasPacker::new(target).unwrap();
        for tile in &tiles {
            packer.place(tile);
        }
        assert_eq!(packer.cursor(), PackCursor { row: 10, column: 0 });
        let atlas = packer.finish();

        assert_eq!(Some(atlas.len()), target.byte_len());
        assert!(atlas.chunks_exact(4).all(|p| p[2] == 1));
    }

    #[test]
    fn border_only_tiles_contribute_nothing() {
        let target = AtlasTarget::new(4, 4);
        let tiles = [solid(1, 1, 9), solid(2, 5, 9), solid(0, 5, 9), solid(0, 0, 9)];

        let mut packer = AtlasPacker::new(target).unwrap();
        for tile in &tiles {
            packer.place(tile);
        }

        assert_eq!(packer.cursor(), PackCursor::default());
        assert!(packer.finish().iter().all(|b| *b == 0));
    }

    #[test]
    fn rgb_tiles_are_widened_to_rgba() {
        let target = AtlasTarget::new(1, 1);
        let tile = SpriteTile::new(DecodedImage::filled(3, 3, &[10, 20, 30]).unwrap());

        let atlas = pack(target, [&tile]).unwrap();

        assert_eq!(atlas, vec![10, 20, 30, 0xFF]);
    }

    #[test]
    fn shelf_advances_by_last_tile_height() {
        let target = AtlasTarget::new(4, 8);
        let tall = bordered(4, 6, 1);
        let short = bordered(4, 3, 2);
        let next = bordered(4, 4, 3);

        let mut packer = AtlasPacker::new(target).unwrap();
        packer.place(&tall);
        packer.place(&short);
        assert_eq!(packer.cursor(), PackCursor { row: 1, column: 0 });
        packer.place(&next);
        let atlas = packer.finish();

        // the next shelf starts below the short tile and overwrites the tall one
        assert_eq!(pixel(&atlas, target, 0, 1), [0, 0, 3, 0xFF]);
        assert_eq!(pixel(&atlas, target, 0, 3), [0, 3, 1, 0xFF]);
    }

    #[test]
    fn packing_is_deterministic() {
        let target = AtlasTarget::new(5, 3);
        let tiles: Vec<_> = (0..6).map(|id| bordered(3 + id as u32 % 2, 4, id)).collect();

        assert_eq!(pack(target, &tiles).unwrap(), pack(target, &tiles).unwrap());
    }

    #[test]
    fn empty_targets_are_rejected() {
        let tile = solid(4, 4, 1);

        for (width, height) in [(0, 0), (0, 4), (4, 0)] {
            let target = AtlasTarget::new(width, height);
            let err = pack(target, [&tile]).unwrap_err();
            assert!(matches!(
                err,
                BackendError::InvalidExtent { width: w, height: h } if (w, h) == (width, height)
            ));
        }
    }

    #[test]
    fn oversized_targets_are_rejected_before_allocating() {
        for (width, height) in [
            (u32::MAX, u32::MAX),
            (100_000, 100_000),
            (MAX_ATLAS_DIMENSION + 1, 1),
        ] {
            let target = AtlasTarget::new(width, height);
            assert!(matches!(
                AtlasPacker::new(target),
                Err(BackendError::InvalidExtent { .. })
            ));
        }

        let largest = AtlasTarget::new(MAX_ATLAS_DIMENSION, 1);
        assert_eq!(largest.validate().unwrap(), MAX_ATLAS_DIMENSION as usize * 4);
    }

    #[test]
    fn byte_len_reports_overflow() {
        assert_eq!(AtlasTarget::new(3, 2).byte_len(), Some(24));
        assert_eq!(AtlasTarget::new(u32::MAX, u32::MAX).byte_len(), None);
    }
}
