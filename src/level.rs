use std::fmt;

use crate::config::BLOCK_LEVELS;
use crate::error::{PixelateError, Result};

/// A selectable pixelation coarseness: a block count per axis, or the
/// untouched original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GranularityLevel {
    Blocks(u32),
    Original,
}

impl GranularityLevel {
    /// Number of selectable levels, the original included.
    pub const COUNT: usize = BLOCK_LEVELS.len() + 1;

    /// Index of the original level, which is also the highest index.
    pub const ORIGINAL_INDEX: usize = BLOCK_LEVELS.len();

    pub fn from_index(index: usize) -> Result<Self> {
        match index {
            i if i < BLOCK_LEVELS.len() => Ok(GranularityLevel::Blocks(BLOCK_LEVELS[i])),
            i if i == Self::ORIGINAL_INDEX => Ok(GranularityLevel::Original),
            i => Err(PixelateError::InvalidArgument(format!(
                "level index {} is out of range 0..={}",
                i,
                Self::ORIGINAL_INDEX
            ))),
        }
    }

    /// Position of this level in the selector. Block counts that are not
    /// part of the configured set have no index.
    pub fn index(&self) -> Option<usize> {
        match *self {
            GranularityLevel::Blocks(blocks) => BLOCK_LEVELS.iter().position(|b| *b == blocks),
            GranularityLevel::Original => Some(Self::ORIGINAL_INDEX),
        }
    }

    pub fn blocks(&self) -> Option<u32> {
        match *self {
            GranularityLevel::Blocks(blocks) => Some(blocks),
            GranularityLevel::Original => None,
        }
    }

    /// Every selectable level in selector order.
    pub fn all() -> impl Iterator<Item = GranularityLevel> {
        BLOCK_LEVELS
            .iter()
            .map(|b| GranularityLevel::Blocks(*b))
            .chain(std::iter::once(GranularityLevel::Original))
    }

    /// Text shown next to the selector.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GranularityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GranularityLevel::Blocks(blocks) => write!(f, "{}×{}", blocks, blocks),
            GranularityLevel::Original => write!(f, "original"),
        }
    }
}
