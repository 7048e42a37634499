use binrw::BinRead;

use crate::chunk_reader::Chunk;
use crate::error::Result;

/// Texture layer flags (32-bit bitfield).
///
/// # Bit Layout
///
/// ```text
/// Bits  | Mask   | Description
/// ------|--------|------------------------------------------
/// 0-7   | 0x0FF  | Animation and overbright (not used here)
/// 8     | 0x100  | Use alpha map for blending
/// 9     | 0x200  | Alpha map compressed (8-bit RLE)
/// 10-31 | ---    | Reflection and reserved bits
/// ```
///
/// Reference: wowdev.wiki ADT/v18#MCLY
#[derive(Debug, Clone, Copy, Default, BinRead, PartialEq, Eq)]
#[br(little)]
pub struct MclyFlags {
    /// Raw flags value
    pub value: u32,
}

impl MclyFlags {
    /// Layer has an alpha map in MCAL.
    pub fn use_alpha_map(&self) -> bool {
        self.value & 0x100 != 0
    }

    /// Alpha map is RLE compressed.
    pub fn alpha_map_compressed(&self) -> bool {
        self.value & 0x200 != 0
    }
}

/// Single texture layer entry (16 bytes).
///
/// # Binary Layout
///
/// ```text
/// Offset | Size | Field           | Description
/// -------|------|-----------------|----------------------------------
/// 0x00   |  4   | texture_id      | Index into MTEX chunk
/// 0x04   |  4   | flags           | MclyFlags bitfield
/// 0x08   |  4   | offset_in_mcal  | Byte offset into MCAL payload
/// 0x0C   |  4   | effect_id       | Ground effect id (unused here)
/// ```
///
/// Reference: <https://wowdev.wiki/ADT/v18#MCLY_sub-chunk>
#[derive(Debug, Clone, Copy, Default, BinRead, PartialEq, Eq)]
#[br(little)]
pub struct MclyLayer {
    /// Texture ID (index into MTEX chunk)
    pub texture_id: u32,

    /// Layer flags
    pub flags: MclyFlags,

    /// Offset into MCAL payload for this layer's alpha map
    pub offset_in_mcal: u32,

    /// Effect ID for ground effects
    pub effect_id: u32,
}

impl MclyLayer {
    /// Size of one entry.
    pub const SIZE: usize = 16;
}

/// MCLY chunk - texture layers of one MCNK.
///
/// Layer 0 is the base texture and never has an alpha map; every later layer
/// blends over the ones before it through its own alpha map.
#[derive(Debug, Clone, Default)]
pub struct MclyChunk {
    /// Layers in blending order
    pub layers: Vec<MclyLayer>,
}

impl MclyChunk {
    /// Parse `layer_count` entries; the payload must be exactly `layer_count * 16` bytes.
    pub fn from_chunk(chunk: &Chunk, layer_count: usize) -> Result<Self> {
        chunk.expect_size(layer_count * MclyLayer::SIZE)?;
        let mut reader = chunk.sub_reader().into_inner();
        let layers = (0..layer_count)
            .map(|_| MclyLayer::read(&mut reader))
            .collect::<binrw::BinResult<Vec<_>>>()?;
        Ok(Self { layers })
    }
}
