//! MCAL alpha map decoding.
//!
//! Every texture layer above the base layer of a sub-chunk blends through a
//! 64×64 alpha map. Three encodings exist, selected by the map-wide alpha
//! mode (from the WDT) and the per-layer compression flag (from MCLY):
//!
//! | Mode        | Compressed | Stored bytes | Edge fix            |
//! |-------------|------------|--------------|---------------------|
//! | `Narrow4Bit`| no         | 2048         | unless MCNK 0x8000  |
//! | `Wide8Bit`  | no         | 4096         | never               |
//! | `Wide8Bit`  | yes        | variable RLE | never               |
//!
//! 4-bit alpha maps cannot be compressed.
//!
//! Reference: <https://wowdev.wiki/ADT/v18#MCAL_sub-chunk>

use std::fmt;

use crate::error::{FormatError, Result};

/// Alpha texel width for a whole map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AlphaMode {
    /// 4 bits per texel, two texels per byte (2048 bytes per map)
    #[default]
    Narrow4Bit,

    /// 8 bits per texel (4096 bytes per map, optionally RLE compressed)
    Wide8Bit,
}

impl AlphaMode {
    /// Mode selected by the WDT "big alpha" flag.
    pub fn from_big_alpha(big_alpha: bool) -> Self {
        if big_alpha {
            Self::Wide8Bit
        } else {
            Self::Narrow4Bit
        }
    }

    /// Whether this is the 8-bit mode.
    pub fn is_big_alpha(self) -> bool {
        self == Self::Wide8Bit
    }

    /// Stored size of one uncompressed alpha map.
    pub fn uncompressed_size(self) -> usize {
        match self {
            Self::Narrow4Bit => AlphaBlock::TEXELS / 2,
            Self::Wide8Bit => AlphaBlock::TEXELS,
        }
    }
}

impl fmt::Display for AlphaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Narrow4Bit => f.write_str("4-bit"),
            Self::Wide8Bit => f.write_str("8-bit"),
        }
    }
}

/// Decoded 64×64 alpha map, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct AlphaBlock([u8; AlphaBlock::TEXELS]);

impl AlphaBlock {
    /// Width and height in texels.
    pub const RESOLUTION: usize = 64;

    /// Total texel count.
    pub const TEXELS: usize = Self::RESOLUTION * Self::RESOLUTION;

    /// Block with every texel set to `value`.
    pub fn filled(value: u8) -> Self {
        Self([value; Self::TEXELS])
    }

    /// Build from exactly 4096 row-major bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let texels: [u8; Self::TEXELS] =
            bytes
                .try_into()
                .map_err(|_| FormatError::TruncatedInput {
                    context: "alpha block",
                    needed: Self::TEXELS,
                    available: bytes.len(),
                })?;
        Ok(Self(texels))
    }

    /// Texel at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is 64 or more.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.0[y * Self::RESOLUTION + x]
    }

    /// Set the texel at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is 64 or more.
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.0[y * Self::RESOLUTION + x] = value;
    }

    /// One row of 64 texels.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * Self::RESOLUTION;
        &self.0[start..start + Self::RESOLUTION]
    }

    /// Raw row-major texels.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Replace the unreliable last column and row of a 4-bit map.
    ///
    /// Column 63 takes the values of column 62, then row 63 takes the values
    /// of row 62, then (63, 63) takes (62, 62).
    pub fn apply_edge_fix(&mut self) {
        const LAST: usize = AlphaBlock::RESOLUTION - 1;
        for y in 0..Self::RESOLUTION {
            let v = self.get(LAST - 1, y);
            self.set(LAST, y, v);
        }
        let (head, tail) = self.0.split_at_mut(LAST * Self::RESOLUTION);
        tail.copy_from_slice(&head[(LAST - 1) * Self::RESOLUTION..]);
        let corner = self.get(LAST - 1, LAST - 1);
        self.set(LAST, LAST, corner);
    }
}

impl Default for AlphaBlock {
    fn default() -> Self {
        Self::filled(0)
    }
}

impl fmt::Debug for AlphaBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min = self.0.iter().copied().min().unwrap_or(0);
        let max = self.0.iter().copied().max().unwrap_or(0);
        f.debug_struct("AlphaBlock")
            .field("min", &min)
            .field("max", &max)
            .finish()
    }
}

/// Expand a 4-bit value to 8 bits by bit replication (`0xA` -> `0xAA`).
#[inline]
pub fn expand_nibble(v: u8) -> u8 {
    (v & 0x0F) | ((v & 0x0F) << 4)
}

fn need(data: &[u8], needed: usize, context: &'static str) -> Result<()> {
    if data.len() < needed {
        return Err(FormatError::TruncatedInput {
            context,
            needed,
            available: data.len(),
        });
    }
    Ok(())
}

fn decode_narrow(data: &[u8]) -> Result<AlphaBlock> {
    need(data, AlphaMode::Narrow4Bit.uncompressed_size(), "4-bit alpha map")?;
    let mut block = AlphaBlock::default();
    for (i, &byte) in data[..AlphaBlock::TEXELS / 2].iter().enumerate() {
        // Low nibble first
        block.0[i * 2] = expand_nibble(byte);
        block.0[i * 2 + 1] = expand_nibble(byte >> 4);
    }
    Ok(block)
}

/// Decompress an 8-bit RLE alpha map.
///
/// Control byte: `[mode:1 | count:7]`
/// - mode 1 (fill): repeat the next byte `count` times
/// - mode 0 (copy): copy the next `count` bytes verbatim
///
/// Decoding stops as soon as 4096 texels exist. Some files encode more than
/// 4096 texels; the surplus is discarded. Returns the block and the number of
/// input bytes consumed.
pub fn decompress_rle(data: &[u8]) -> Result<(AlphaBlock, usize)> {
    let mut output = Vec::with_capacity(AlphaBlock::TEXELS + 127);
    let mut pos = 0;

    let truncated = |produced: usize| FormatError::TruncatedInput {
        context: "compressed alpha map",
        needed: AlphaBlock::TEXELS,
        available: produced,
    };

    while output.len() < AlphaBlock::TEXELS {
        let &control = data.get(pos).ok_or_else(|| truncated(output.len()))?;
        pos += 1;

        let count = usize::from(control & 0x7F);
        if control & 0x80 != 0 {
            let &fill = data.get(pos).ok_or_else(|| truncated(output.len()))?;
            pos += 1;
            output.resize(output.len() + count, fill);
        } else {
            let run = data
                .get(pos..pos + count)
                .ok_or_else(|| truncated(output.len()))?;
            pos += count;
            output.extend_from_slice(run);
        }
    }

    output.truncate(AlphaBlock::TEXELS);
    Ok((AlphaBlock::from_bytes(&output)?, pos))
}

/// Decode one layer's alpha map into a 64×64 block.
///
/// `data` starts at the first byte of the layer's alpha map and may extend
/// past it; only the bytes the encoding needs are read. `apply_edge_fix` only
/// affects 4-bit maps.
///
/// # Errors
///
/// - [`FormatError::CompressedNarrowAlpha`] for a compressed 4-bit map
/// - [`FormatError::TruncatedInput`] when `data` is too short
pub fn decode_alpha_layer(
    data: &[u8],
    mode: AlphaMode,
    compressed: bool,
    apply_edge_fix: bool,
) -> Result<AlphaBlock> {
    match (mode, compressed) {
        (AlphaMode::Narrow4Bit, true) => Err(FormatError::CompressedNarrowAlpha),
        (AlphaMode::Narrow4Bit, false) => {
            let mut block = decode_narrow(data)?;
            if apply_edge_fix {
                block.apply_edge_fix();
            }
            Ok(block)
        }
        (AlphaMode::Wide8Bit, false) => {
            need(data, AlphaBlock::TEXELS, "8-bit alpha map")?;
            AlphaBlock::from_bytes(&data[..AlphaBlock::TEXELS])
        }
        (AlphaMode::Wide8Bit, true) => decompress_rle(data).map(|(block, _)| block),
    }
}
