//! Fixed-size root chunks with binrw derives (MVER, MHDR, MCIN).

use std::io::{Read, Seek};

use binrw::BinRead;

use crate::chunk_id::ChunkId;
use crate::chunk_reader::{Chunk, ChunkReader};
use crate::error::{FormatError, Result};

/// Format version shared by ADT and WDT files.
pub const FORMAT_VERSION: u32 = 18;

/// MVER - Version chunk (4 bytes, always 18)
///
/// Reference: <https://wowdev.wiki/ADT/v18#MVER_chunk>
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct MverChunk {
    /// Version number
    pub version: u32,
}

impl MverChunk {
    /// Payload size in bytes.
    pub const SIZE: usize = 4;

    /// Read the MVER chunk at the current position and require version 18.
    pub fn read_required<R: Read + Seek>(reader: &mut ChunkReader<R>) -> Result<Self> {
        let chunk = reader.expect(ChunkId::MVER)?;
        chunk.expect_size(Self::SIZE)?;
        let mver: Self = chunk.parse()?;
        if mver.version != FORMAT_VERSION {
            return Err(FormatError::UnsupportedVersion(mver.version));
        }
        Ok(mver)
    }
}

/// MHDR - Header chunk (64 bytes)
///
/// Offsets are relative to the first byte of the MHDR payload, not to the
/// file start. In a standard file the payload begins at 0x14, right after
/// MVER and the MHDR header.
///
/// ```text
/// Offset | Size | Field         | Description
/// -------|------|---------------|------------------------------------
/// 0x00   |  4   | flags         | MFBO/MH2O presence bits
/// 0x04   |  4   | mcin_offset   | MCIN chunk (sub-chunk index)
/// 0x08   |  4   | mtex_offset   | MTEX chunk (texture names)
/// 0x0C   | 52   | other_offsets | MMDX..MTXF offsets and reserved fields
/// ```
///
/// Reference: <https://wowdev.wiki/ADT/v18#MHDR_chunk>
#[derive(Debug, Clone, Copy, Default, BinRead)]
#[br(little)]
pub struct MhdrChunk {
    /// Flags indicating optional features
    pub flags: u32,

    /// Offset to MCIN chunk
    pub mcin_offset: u32,

    /// Offset to MTEX chunk
    pub mtex_offset: u32,

    /// Offsets to model, placement, flight bound, water and texture flag chunks
    pub other_offsets: [u32; 13],
}

impl MhdrChunk {
    /// Payload size in bytes.
    pub const SIZE: usize = 64;
}

/// MCIN entry (16 bytes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct McinEntry {
    /// Absolute file offset to MCNK chunk header
    pub offset: u32,

    /// Size of MCNK chunk in bytes, including its 8-byte header
    pub size: u32,

    /// Flags (unused by the client on disk)
    pub flags: u32,

    /// Async object ID (runtime only)
    pub async_id: u32,
}

/// MCIN - MCNK chunk index (4096 bytes = 256 entries × 16 bytes)
///
/// Entries are stored row-major: `index = y * 16 + x`.
///
/// Reference: <https://wowdev.wiki/ADT/v18#MCIN_chunk>
#[derive(Debug, Clone, BinRead)]
#[br(little)]
pub struct McinChunk {
    /// 256 index entries (16x16 grid)
    #[br(count = McinChunk::ENTRIES)]
    pub entries: Vec<McinEntry>,
}

impl McinChunk {
    /// Grid width and height.
    pub const GRID: usize = 16;

    /// Number of entries.
    pub const ENTRIES: usize = Self::GRID * Self::GRID;

    /// Payload size in bytes.
    pub const SIZE: usize = Self::ENTRIES * 16;

    /// Parse from a chunk whose payload must be exactly 4096 bytes.
    pub fn from_chunk(chunk: &Chunk) -> Result<Self> {
        chunk.expect_size(Self::SIZE)?;
        chunk.parse()
    }

    /// Get MCIN entry for the sub-chunk at (x, y).
    ///
    /// Returns `None` if either coordinate is 16 or more.
    pub fn get_entry(&self, x: usize, y: usize) -> Option<&McinEntry> {
        if x >= Self::GRID || y >= Self::GRID {
            return None;
        }
        self.entries.get(y * Self::GRID + x)
    }
}
