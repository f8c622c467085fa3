use std::collections::HashMap;

use image::{Rgba, RgbaImage};
use log::debug;

use super::{Block, BlockGrid, Pixelizer};
use crate::error::Result;

/// Pixelizer that paints every block with its most frequent RGB color.
///
/// Alpha is ignored when counting and the output is fully opaque. The
/// winner is tracked while scanning the block in row-major order and only
/// replaced by a strictly higher count, so on a tie the color that reached
/// that count first wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModePixelizer;

fn color_key(pixel: &Rgba<u8>) -> u32 {
    let [r, g, b, _] = pixel.0;
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

fn key_to_pixel(key: u32) -> Rgba<u8> {
    Rgba([(key >> 16) as u8, (key >> 8) as u8, key as u8, 255])
}

/// Most frequent color key of `block`.
fn mode_color(img: &RgbaImage, block: &Block) -> u32 {
    let mut counts: HashMap<u32, u32> = HashMap::with_capacity(block.area());
    let mut best_key = 0;
    let mut best_count = 0;

    for y in block.y..block.y + block.height {
        for x in block.x..block.x + block.width {
            let key = color_key(img.get_pixel(x, y));
            let count = counts.entry(key).or_insert(0);
            *count += 1;
            if *count > best_count {
                best_count = *count;
                best_key = key;
            }
        }
    }
    best_key
}

impl Pixelizer for ModePixelizer {
    fn pixelize(&self, img: &RgbaImage, blocks: u32) -> Result<RgbaImage> {
        let grid = BlockGrid::new(img.width(), img.height(), blocks)?;
        let mut out = RgbaImage::new(img.width(), img.height());

        for block in grid.blocks() {
            let color = key_to_pixel(mode_color(img, &block));
            for y in block.y..block.y + block.height {
                for x in block.x..block.x + block.width {
                    out.put_pixel(x, y, color);
                }
            }
        }

        debug!(
            "pixelized {}x{} into {} blocks per axis (step {:?})",
            img.width(),
            img.height(),
            blocks,
            grid.step()
        );
        Ok(out)
    }
}
