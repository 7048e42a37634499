//! Assembly of per-texture alpha canvases for a whole tile.
//!
//! A tile is a 16×16 grid of sub-chunks and each sub-chunk carries a 64×64
//! alpha map per layer, so one texture's coverage of a tile is a 1024×1024
//! image. The base layer (layer 0) of a sub-chunk has no stored alpha map;
//! its coverage is whatever the explicit layers leave over:
//!
//! ```text
//! base(x, y) = max(0, 255 - sum(layer_i(x, y) for i >= 1))
//! ```

use std::fmt;

use crate::chunks::AlphaBlock;
use crate::error::{FormatError, Result};

/// 1024×1024 single-channel alpha image for one texture.
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    data: Vec<u8>,
}

impl Canvas {
    /// Width and height in pixels.
    pub const SIZE: usize = 1024;

    /// Sub-chunks per tile side.
    pub const CHUNKS: usize = Self::SIZE / AlphaBlock::RESOLUTION;

    /// Zero-filled canvas.
    pub fn new() -> Self {
        Self {
            data: vec![0; Self::SIZE * Self::SIZE],
        }
    }

    /// Pixel at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is 1024 or more.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * Self::SIZE + x]
    }

    /// Copy a 64×64 block into the region of sub-chunk (`chunk_x`, `chunk_y`).
    ///
    /// The block covers pixels `64 * chunk_x .. + 64` horizontally and
    /// `64 * chunk_y .. + 64` vertically.
    ///
    /// # Panics
    ///
    /// Panics if either chunk coordinate is 16 or more.
    pub fn write_block(&mut self, chunk_x: usize, chunk_y: usize, block: &AlphaBlock) {
        let left = chunk_x * AlphaBlock::RESOLUTION;
        let top = chunk_y * AlphaBlock::RESOLUTION;
        for row in 0..AlphaBlock::RESOLUTION {
            let start = (top + row) * Self::SIZE + left;
            self.data[start..start + AlphaBlock::RESOLUTION].copy_from_slice(block.row(row));
        }
    }

    /// Row-major pixels.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take the row-major pixel buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let covered = self.data.iter().filter(|&&v| v != 0).count();
        f.debug_struct("Canvas")
            .field("size", &Self::SIZE)
            .field("covered", &covered)
            .finish()
    }
}

/// Running base-layer alpha for one sub-chunk.
///
/// Starts at 255 everywhere; each explicit layer is subtracted with a floor
/// of zero.
#[derive(Debug, Clone)]
pub struct BaseLayerAccumulator {
    block: AlphaBlock,
}

impl BaseLayerAccumulator {
    /// Fully opaque accumulator.
    pub fn new() -> Self {
        Self {
            block: AlphaBlock::filled(u8::MAX),
        }
    }

    /// Remove one explicit layer's coverage.
    pub fn subtract(&mut self, layer: &AlphaBlock) {
        for y in 0..AlphaBlock::RESOLUTION {
            for x in 0..AlphaBlock::RESOLUTION {
                let v = self.block.get(x, y).saturating_sub(layer.get(x, y));
                self.block.set(x, y, v);
            }
        }
    }

    /// Current base-layer alpha.
    pub fn as_block(&self) -> &AlphaBlock {
        &self.block
    }

    /// Finish and return the base-layer alpha.
    pub fn into_block(self) -> AlphaBlock {
        self.block
    }
}

impl Default for BaseLayerAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns one canvas per texture of a tile while its sub-chunks are decoded.
#[derive(Debug, Clone)]
pub struct Compositor {
    canvases: Vec<Canvas>,
}

impl Compositor {
    /// One zeroed canvas per texture id.
    pub fn new(texture_count: usize) -> Self {
        Self {
            canvases: vec![Canvas::new(); texture_count],
        }
    }

    /// Number of canvases.
    pub fn len(&self) -> usize {
        self.canvases.len()
    }

    /// Whether there are no canvases.
    pub fn is_empty(&self) -> bool {
        self.canvases.is_empty()
    }

    /// Canvas for `texture_id`.
    pub fn canvas(&self, texture_id: usize) -> Option<&Canvas> {
        self.canvases.get(texture_id)
    }

    /// Write a block into the canvas of `texture_id`.
    ///
    /// # Errors
    ///
    /// [`FormatError::InvalidTextureReference`] if `texture_id` has no canvas.
    pub fn blit(
        &mut self,
        texture_id: u32,
        chunk_x: usize,
        chunk_y: usize,
        block: &AlphaBlock,
    ) -> Result<()> {
        let count = self.canvases.len();
        let canvas = usize::try_from(texture_id)
            .ok()
            .and_then(|id| self.canvases.get_mut(id))
            .ok_or(FormatError::InvalidTextureReference {
                index: texture_id,
                count,
            })?;
        canvas.write_block(chunk_x, chunk_y, block);
        Ok(())
    }

    /// Hand over the finished canvases, indexed by texture id.
    pub fn finish(self) -> Vec<Canvas> {
        self.canvases
    }
}
