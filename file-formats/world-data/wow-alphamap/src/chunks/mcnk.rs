//! MCNK chunk header.
//!
//! Only the leading fields needed to locate texture layers and alpha maps are
//! read; the remainder of the 128-byte header (area id, holes, liquid and
//! sound offsets, position) is left in the payload untouched.
//!
//! **Critical:** subchunk offsets are relative to the beginning of the MCNK
//! chunk (including its 8-byte header), NOT relative to the MCNK payload.

use binrw::BinRead;

/// MCNK chunk flags (32-bit bitfield).
///
/// Reference: <https://wowdev.wiki/ADT/v18#MCNK_header>
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct McnkFlags {
    /// Raw flags value
    pub value: u32,
}

impl McnkFlags {
    /// Do not fix alpha map (bit 15, 0x8000).
    ///
    /// When clear, 4-bit alpha maps carry unreliable data in their last row
    /// and column, which must be replaced with the previous row and column.
    pub fn do_not_fix_alpha_map(&self) -> bool {
        self.value & 0x8000 != 0
    }
}

/// Leading 44 bytes of the MCNK header.
///
/// ```text
/// Offset | Size | Field          | Description
/// -------|------|----------------|---------------------------------
/// 0x00   |  4   | flags          | McnkFlags bitfield
/// 0x04   |  4   | index_x        | Grid X coordinate (0-15)
/// 0x08   |  4   | index_y        | Grid Y coordinate (0-15)
/// 0x0C   |  4   | n_layers       | Texture layer count
/// 0x10   |  4   | n_doodad_refs  | M2 model reference count
/// 0x14   |  4   | ofs_height     | MCVT offset
/// 0x18   |  4   | ofs_normal     | MCNR offset
/// 0x1C   |  4   | ofs_layer      | MCLY offset
/// 0x20   |  4   | ofs_refs       | MCRF offset
/// 0x24   |  4   | ofs_alpha      | MCAL offset (points at the MCAL header)
/// 0x28   |  4   | size_alpha     | MCAL size, including its 8-byte header
/// ```
#[derive(Debug, Clone, Copy, BinRead)]
#[br(little)]
pub struct McnkHeader {
    /// Chunk flags
    pub flags: McnkFlags,

    /// Grid X index (0-15 within the tile)
    pub index_x: u32,

    /// Grid Y index (0-15 within the tile)
    pub index_y: u32,

    /// Number of texture layers
    pub n_layers: u32,

    /// Number of M2 doodad references
    pub n_doodad_refs: u32,

    /// Offset to MCVT (heights)
    pub ofs_height: u32,

    /// Offset to MCNR (normals)
    pub ofs_normal: u32,

    /// Offset to MCLY (texture layers)
    pub ofs_layer: u32,

    /// Offset to MCRF (object references)
    pub ofs_refs: u32,

    /// Offset to MCAL (alpha maps)
    pub ofs_alpha: u32,

    /// Size of the MCAL region
    pub size_alpha: u32,
}

impl McnkHeader {
    /// Bytes read from the start of the MCNK payload.
    pub const SIZE: usize = 44;
}
