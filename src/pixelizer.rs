use image::RgbaImage;

use crate::error::{PixelateError, Result};

/// A rectangle of the pixel grid that is flattened to one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Block {
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Partition of a `width` x `height` grid into `blocks` x `blocks` cells.
///
/// Cell extents use ceiling division so the grid always covers the whole
/// image; the last row and column are clipped to the image bounds.
#[derive(Debug, Clone, Copy)]
pub struct BlockGrid {
    width: u32,
    height: u32,
    step_x: u32,
    step_y: u32,
}

impl BlockGrid {
    pub fn new(width: u32, height: u32, blocks: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PixelateError::InvalidArgument(format!(
                "image dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if blocks == 0 {
            return Err(PixelateError::InvalidArgument(
                "block count must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            width,
            height,
            step_x: width.div_ceil(blocks),
            step_y: height.div_ceil(blocks),
        })
    }

    pub fn step(&self) -> (u32, u32) {
        (self.step_x, self.step_y)
    }

    /// Blocks in row-major order of their origins.
    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        (0..self.height).step_by(self.step_y as usize).flat_map(move |y| {
            (0..self.width).step_by(self.step_x as usize).map(move |x| Block {
                x,
                y,
                width: self.step_x.min(self.width - x),
                height: self.step_y.min(self.height - y),
            })
        })
    }
}

pub trait Pixelizer {
    /// Quantize `img` to a grid of `blocks` x `blocks` flat-colored cells.
    /// The result keeps the dimensions of `img`.
    fn pixelize(&self, img: &RgbaImage, blocks: u32) -> Result<RgbaImage>;
}

/// Pixelate a raw interleaved RGBA buffer with the default mode-color
/// pixelizer.
pub fn pixelate(source: &[u8], width: u32, height: u32, blocks: u32) -> Result<Vec<u8>> {
    let expected = width as usize * height as usize * 4;
    if source.len() != expected {
        return Err(PixelateError::InvalidArgument(format!(
            "buffer of {} bytes does not match {}x{} RGBA ({} bytes)",
            source.len(),
            width,
            height,
            expected
        )));
    }
    let img = RgbaImage::from_raw(width, height, source.to_vec()).ok_or_else(|| {
        PixelateError::InvalidArgument(format!("cannot view buffer as {}x{} RGBA", width, height))
    })?;
    let pixelized = mode_pixelizer::ModePixelizer.pixelize(&img, blocks)?;
    Ok(pixelized.into_raw())
}

pub mod mode_pixelizer;

#[cfg(test)]
mod tests {
    use super::{pixelate, Block, BlockGrid};
    use crate::error::PixelateError;

    #[test]
    fn ceil_steps_cover_odd_sizes() {
        let grid = BlockGrid::new(5, 5, 2).unwrap();
        assert_eq!(grid.step(), (3, 3));
        let blocks: Vec<Block> = grid.blocks().collect();
        assert_eq!(
            blocks,
            vec![
                Block { x: 0, y: 0, width: 3, height: 3 },
                Block { x: 3, y: 0, width: 2, height: 3 },
                Block { x: 0, y: 3, width: 3, height: 2 },
                Block { x: 3, y: 3, width: 2, height: 2 },
            ]
        );
        let covered: usize = blocks.iter().map(Block::area).sum();
        assert_eq!(covered, 25);
    }

    #[test]
    fn more_blocks_than_pixels_degenerates_to_single_pixels() {
        let grid = BlockGrid::new(3, 2, 256).unwrap();
        assert_eq!(grid.step(), (1, 1));
        assert_eq!(grid.blocks().count(), 6);
        assert!(grid.blocks().all(|b| b.area() == 1));
    }

    #[test]
    fn non_square_image_gets_per_axis_steps() {
        let grid = BlockGrid::new(10, 4, 4).unwrap();
        assert_eq!(grid.step(), (3, 1));
        // 4 columns at x = 0, 3, 6, 9, the last one clipped to 1 pixel
        let first_row: Vec<Block> = grid.blocks().filter(|b| b.y == 0).collect();
        assert_eq!(first_row.len(), 4);
        assert_eq!(first_row[3].width, 1);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(matches!(
            BlockGrid::new(0, 4, 2),
            Err(PixelateError::InvalidArgument(_))
        ));
        assert!(matches!(
            BlockGrid::new(4, 4, 0),
            Err(PixelateError::InvalidArgument(_))
        ));
        assert!(matches!(
            pixelate(&[0; 15], 2, 2, 1),
            Err(PixelateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn raw_buffer_keeps_its_length() {
        for (w, h) in [(1, 1), (3, 7), (16, 9)] {
            let source = vec![200u8; (w * h * 4) as usize];
            for blocks in [1, 2, 4, 256] {
                let out = pixelate(&source, w, h, blocks).unwrap();
                assert_eq!(out.len(), (w * h * 4) as usize);
            }
        }
    }
}
