//! Error types for alpha map extraction.
//!
//! Parsing is fail-fast per file: the first structural problem aborts the
//! current map descriptor or terrain tile and is reported to the caller. No
//! error is fatal to a batch; the batch driver records the failure and moves
//! on to the next file.
//!
//! # Error Categories
//!
//! ## Structural errors (abort the current file)
//!
//! - [`FormatError::BadMagic`] - Chunk tag doesn't match the chunk expected at that offset
//! - [`FormatError::UnsupportedVersion`] - MVER is not 18
//! - [`FormatError::SizeMismatch`] - Declared chunk size disagrees with the format
//! - [`FormatError::IndexMismatch`] - MCNK reports a grid position other than its MCIN slot
//! - [`FormatError::LayerPolicyViolation`] - Layer alpha flags break the layer 0 rule
//! - [`FormatError::TruncatedInput`] - Fewer bytes than a read or decode step needs
//! - [`FormatError::CompressedNarrowAlpha`] - RLE flag set on a 4-bit alpha map
//! - [`FormatError::MissingChunk`] - A required chunk never appears
//! - [`FormatError::InvalidTextureReference`] - Layer texture id is not in MTEX
//! - [`FormatError::InvalidTileName`] - File name is not `<map>_<x>_<y>`
//!
//! ## Benign outcomes
//!
//! - [`FormatError::NoTextures`] - Tile has an empty MTEX; nothing to produce
//!
//! # Examples
//!
//! ```
//! use wow_alphamap::{ChunkId, FormatError, Result};
//!
//! fn check_magic(found: ChunkId, expected: ChunkId, offset: u64) -> Result<()> {
//!     if found != expected {
//!         return Err(FormatError::BadMagic { expected, found, offset });
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_magic(ChunkId::MCNK, ChunkId::MCNK, 0).is_ok());
//! ```

use thiserror::Error;

use crate::ChunkId;

/// Result type alias using [`FormatError`] as the error type.
pub type Result<T> = std::result::Result<T, FormatError>;

/// Errors that can occur while decoding map descriptors and terrain tiles.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Underlying I/O error while reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Chunk tag doesn't match the chunk expected at this position.
    ///
    /// ```text
    /// Expected MCNK at offset 0x1000, but found MCLQ instead.
    /// ```
    #[error("Invalid magic bytes: expected {expected}, found {found} at offset {offset}")]
    BadMagic {
        /// Expected chunk identifier.
        expected: ChunkId,
        /// Chunk identifier found in the file.
        found: ChunkId,
        /// Absolute file offset of the chunk header.
        offset: u64,
    },

    /// MVER chunk holds a version other than 18.
    #[error("Unsupported version: expected 18, found {0}")]
    UnsupportedVersion(u32),

    /// Declared size disagrees with the size the format requires.
    #[error("Invalid chunk size for {chunk}: expected {expected}, got {actual}")]
    SizeMismatch {
        /// Chunk with the invalid size.
        chunk: ChunkId,
        /// Size required by the format or by the index.
        expected: usize,
        /// Size declared in the file.
        actual: usize,
    },

    /// MCNK header reports coordinates that differ from its MCIN slot.
    #[error("MCNK index mismatch: expected ({}, {}), found ({}, {})", expected.0, expected.1, found.0, found.1)]
    IndexMismatch {
        /// `(x, y)` position in the MCIN grid.
        expected: (u32, u32),
        /// `(x, y)` stored in the MCNK header.
        found: (u32, u32),
    },

    /// Layer alpha flags break the rule that only layers 1.. carry alpha maps.
    #[error("Layer {layer} of MCNK ({chunk_x}, {chunk_y}): {reason}")]
    LayerPolicyViolation {
        /// MCNK grid column.
        chunk_x: u32,
        /// MCNK grid row.
        chunk_y: u32,
        /// Index of the offending layer within MCLY.
        layer: usize,
        /// What is wrong with the layer.
        reason: &'static str,
    },

    /// Input ended before a read or decode step had enough bytes.
    #[error("Truncated input in {context}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        /// What was being read.
        context: &'static str,
        /// Bytes required.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// RLE compression was requested for a 4-bit alpha map.
    ///
    /// Only 8-bit alpha maps can be compressed. Tile parsing reports this as
    /// [`FormatError::LayerPolicyViolation`] with the sub-chunk coordinates.
    #[error("Compressed alpha maps require 8-bit alpha mode")]
    CompressedNarrowAlpha,

    /// MTEX chunk lists no textures, so the tile produces no alpha maps.
    ///
    /// This is a skip, not a failure.
    #[error("Tile has no textures")]
    NoTextures,

    /// A required chunk never appeared in the file.
    #[error("Missing required chunk: {0}")]
    MissingChunk(ChunkId),

    /// Layer references a texture id outside the MTEX list.
    #[error("Invalid texture reference: index {index} exceeds texture count {count}")]
    InvalidTextureReference {
        /// Texture index from MCLY.
        index: u32,
        /// Number of textures in MTEX.
        count: usize,
    },

    /// Tile file name is not `<map>_<x>_<y>`.
    #[error("Invalid tile name: {0}")]
    InvalidTileName(String),

    /// Binary parsing library error.
    #[error("binrw error: {0}")]
    Binrw(String),

    /// Image encoding error during export.
    #[cfg(feature = "export")]
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl FormatError {
    /// Whether this outcome means "nothing to do" rather than a broken file.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::NoTextures)
    }
}

impl From<binrw::Error> for FormatError {
    fn from(err: binrw::Error) -> Self {
        match err {
            binrw::Error::Io(io) => Self::Io(io),
            other => Self::Binrw(format!("{other}")),
        }
    }
}
