//! MTEX string table.
//!
//! Texture filenames are stored as consecutive null-terminated strings with no
//! padding. Some files contain non-ASCII bytes, so decoding is lossy UTF-8.

use crate::chunk_reader::Chunk;

/// MTEX chunk - Texture filenames
///
/// Contains null-terminated texture paths (e.g. `"Tileset\\Elwynn\\ElwynnGrass.blp\0"`).
/// The position of a name in [`filenames`](Self::filenames) is the texture id
/// that MCLY layers refer to.
///
/// Reference: <https://wowdev.wiki/ADT/v18#MTEX_chunk>
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MtexChunk {
    /// Texture filenames in id order
    pub filenames: Vec<String>,
}

impl MtexChunk {
    /// Parse the payload of an MTEX chunk.
    pub fn from_chunk(chunk: &Chunk) -> Self {
        Self::from_bytes(&chunk.data)
    }

    /// Split raw payload bytes into texture names.
    ///
    /// Empty entries (runs of `\0`, trailing padding) are dropped.
    pub fn from_bytes(data: &[u8]) -> Self {
        let filenames = data
            .split(|&b| b == 0)
            .filter(|name| !name.is_empty())
            .map(|name| String::from_utf8_lossy(name).into_owned())
            .collect();
        Self { filenames }
    }

    /// Number of textures.
    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}
