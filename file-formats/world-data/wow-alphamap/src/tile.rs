//! ADT terrain tile parsing.
//!
//! A root ADT file is walked by offset, not sequentially:
//!
//! ```text
//! MVER ─ MHDR ─┬─ mtex_offset ─> MTEX (texture names)
//!              └─ mcin_offset ─> MCIN (256 × absolute MCNK offset/size)
//!                                  │
//!                                  └─> MCNK (x, y) ─┬─ ofs_layer ─> MCLY
//!                                                   └─ ofs_alpha ─> MCAL
//! ```
//!
//! MHDR offsets are relative to the MHDR payload; MCIN offsets are absolute;
//! MCNK subchunk offsets are relative to the MCNK chunk start (its header).
//! Every alpha map of every sub-chunk is decoded and composited into one
//! 1024×1024 canvas per texture.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::str::FromStr;

use crate::chunk_id::ChunkId;
use crate::chunk_reader::{Chunk, ChunkHeader, ChunkReader};
use crate::chunks::{
    AlphaMode, McinChunk, MclyChunk, McnkHeader, MhdrChunk, MtexChunk, MverChunk,
    decode_alpha_layer,
};
use crate::compositor::{BaseLayerAccumulator, Canvas, Compositor};
use crate::error::{FormatError, Result};

/// Tile name parsed from an ADT file stem: `<map>_<x>_<y>`.
///
/// Map names may contain underscores; the last two fields are the tile
/// coordinates.
///
/// ```
/// use wow_alphamap::TileName;
///
/// let tile: TileName = "Azeroth_32_48".parse().unwrap();
/// assert_eq!(tile.map, "Azeroth");
/// assert_eq!((tile.x, tile.y), (32, 48));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileName {
    /// Map name, the key into the map alpha table
    pub map: String,
    /// Tile column
    pub x: u32,
    /// Tile row
    pub y: u32,
}

impl TileName {
    /// Parse the stem of an ADT path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .ok_or_else(|| FormatError::InvalidTileName(path.display().to_string()))?;
        stem.to_string_lossy().parse()
    }
}

impl FromStr for TileName {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FormatError::InvalidTileName(s.to_string());
        let mut fields = s.rsplitn(3, '_');
        let y = fields.next().ok_or_else(invalid)?;
        let x = fields.next().ok_or_else(invalid)?;
        let map = fields.next().filter(|m| !m.is_empty()).ok_or_else(invalid)?;
        Ok(Self {
            map: map.to_string(),
            x: x.parse().map_err(|_| invalid())?,
            y: y.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for TileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.map, self.x, self.y)
    }
}

/// Decoded alpha canvases of one tile.
#[derive(Debug, Clone)]
pub struct TileAlphaMaps {
    /// Texture filenames from MTEX, indexed by texture id
    pub textures: Vec<String>,

    /// One canvas per texture, same order as `textures`
    pub canvases: Vec<Canvas>,
}

impl TileAlphaMaps {
    /// Iterate over `(texture name, canvas)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Canvas)> {
        self.textures
            .iter()
            .map(String::as_str)
            .zip(self.canvases.iter())
    }
}

/// Parser for ADT tiles of a single alpha mode.
#[derive(Debug, Clone, Copy)]
pub struct TileParser {
    mode: AlphaMode,
}

impl TileParser {
    /// Parser for tiles whose map uses `mode`.
    pub fn new(mode: AlphaMode) -> Self {
        Self { mode }
    }

    /// Alpha mode used for decoding.
    pub fn mode(&self) -> AlphaMode {
        self.mode
    }

    /// Parse an ADT file from disk.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<TileAlphaMaps> {
        let file = File::open(path)?;
        self.parse(BufReader::new(file))
    }

    /// Parse an ADT stream into alpha canvases.
    ///
    /// # Errors
    ///
    /// - [`FormatError::NoTextures`] when MTEX is empty (a skip, not a failure)
    /// - [`FormatError::IndexMismatch`] when an MCNK is not at its MCIN slot
    /// - [`FormatError::LayerPolicyViolation`] when layer alpha flags are inconsistent
    /// - any chunk-level error from [`ChunkReader`]
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<TileAlphaMaps> {
        let mut reader = ChunkReader::new(reader)?;
        MverChunk::read_required(&mut reader)?;

        let mhdr_chunk = reader.expect(ChunkId::MHDR)?;
        mhdr_chunk.expect_size(MhdrChunk::SIZE)?;
        let mhdr: MhdrChunk = mhdr_chunk.parse()?;
        let base = mhdr_chunk.offset;

        reader.seek(base + u64::from(mhdr.mtex_offset))?;
        let mtex = MtexChunk::from_chunk(&reader.expect(ChunkId::MTEX)?);
        if mtex.is_empty() {
            return Err(FormatError::NoTextures);
        }
        log::debug!("MTEX: {} textures", mtex.len());

        let mut compositor = Compositor::new(mtex.len());

        reader.seek(base + u64::from(mhdr.mcin_offset))?;
        let mcin = McinChunk::from_chunk(&reader.expect(ChunkId::MCIN)?)?;

        for y in 0..McinChunk::GRID {
            for x in 0..McinChunk::GRID {
                let entry = mcin.entries[y * McinChunk::GRID + x];
                reader.seek(u64::from(entry.offset))?;
                let header = reader.expect_header(ChunkId::MCNK)?;
                let expected = entry.size.saturating_sub(ChunkHeader::SIZE as u32);
                if header.size != expected {
                    return Err(FormatError::SizeMismatch {
                        chunk: ChunkId::MCNK,
                        expected: expected as usize,
                        actual: header.size as usize,
                    });
                }
                let mcnk = reader.read_payload(header)?;
                self.composite_subchunk(&mcnk, x, y, &mut compositor)?;
            }
        }

        Ok(TileAlphaMaps {
            textures: mtex.filenames,
            canvases: compositor.finish(),
        })
    }

    fn composite_subchunk(
        &self,
        mcnk: &Chunk,
        x: usize,
        y: usize,
        compositor: &mut Compositor,
    ) -> Result<()> {
        let header: McnkHeader = mcnk.parse()?;
        let position = (x as u32, y as u32);
        if (header.index_x, header.index_y) != position {
            return Err(FormatError::IndexMismatch {
                expected: position,
                found: (header.index_x, header.index_y),
            });
        }

        let layer_count = header.n_layers as usize;
        let mut sub = mcnk.sub_reader();
        sub.seek(payload_offset(header.ofs_layer)?)?;
        let mcly_header = sub.expect_header(ChunkId::MCLY)?;
        let mcly_chunk = sub.read_payload(mcly_header)?;
        let mcly = MclyChunk::from_chunk(&mcly_chunk, layer_count)?;

        let Some((base_layer, layers)) = mcly.layers.split_first() else {
            log::trace!("MCNK ({x}, {y}) has no texture layers");
            return Ok(());
        };

        let violation = |layer: usize, reason: &'static str| FormatError::LayerPolicyViolation {
            chunk_x: position.0,
            chunk_y: position.1,
            layer,
            reason,
        };

        if base_layer.flags.use_alpha_map() {
            return Err(violation(0, "base layer has an alpha map"));
        }

        if !layers.is_empty() {
            // Alpha maps follow the MCAL header inside the MCNK payload
            sub.seek(payload_offset(header.ofs_alpha)?)?;
            sub.expect_header(ChunkId::MCAL)?;
        }

        let apply_edge_fix = !header.flags.do_not_fix_alpha_map();
        let mut base = BaseLayerAccumulator::new();

        for (i, layer) in layers.iter().enumerate() {
            let index = i + 1;
            if !layer.flags.use_alpha_map() {
                return Err(violation(index, "layer has no alpha map"));
            }
            let compressed = layer.flags.alpha_map_compressed();
            if compressed && self.mode == AlphaMode::Narrow4Bit {
                return Err(violation(index, "4-bit alpha map is compressed"));
            }

            let offset = layer.offset_in_mcal as usize;
            if !compressed {
                let needed = offset + self.mode.uncompressed_size();
                if needed > header.size_alpha as usize {
                    return Err(FormatError::TruncatedInput {
                        context: "MCAL layer",
                        needed,
                        available: header.size_alpha as usize,
                    });
                }
            }

            let start = header.ofs_alpha as usize + offset;
            let data = mcnk.data.get(start..).ok_or(FormatError::TruncatedInput {
                context: "MCAL layer",
                needed: start,
                available: mcnk.len(),
            })?;

            let block = decode_alpha_layer(data, self.mode, compressed, apply_edge_fix)?;
            base.subtract(&block);
            compositor.blit(layer.texture_id, x, y, &block)?;
        }

        compositor.blit(base_layer.texture_id, x, y, base.as_block())
    }
}

/// Convert an MCNK-relative subchunk offset (counted from the MCNK header)
/// into an offset within the MCNK payload.
fn payload_offset(relative: u32) -> Result<u64> {
    u64::from(relative)
        .checked_sub(ChunkHeader::SIZE)
        .ok_or(FormatError::TruncatedInput {
            context: "MCNK subchunk offset",
            needed: ChunkHeader::SIZE as usize,
            available: relative as usize,
        })
}
