//! WDT map descriptors and the map name -> alpha mode table.
//!
//! A WDT file describes a whole map. The only fact needed for alpha map
//! extraction is whether the map's tiles store 8-bit ("big") alpha maps,
//! which the MPHD flags word carries in bit 2.
//!
//! ```text
//! WDT File Structure
//! ├── MVER (version = 18)
//! ├── MPHD (32 bytes: flags + reserved)
//! ├── MAIN (tile existence grid)     skipped
//! └── ...                            skipped
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use binrw::BinRead;
use bitflags::bitflags;

use crate::chunk_id::ChunkId;
use crate::chunk_reader::ChunkReader;
use crate::chunks::AlphaMode;
use crate::chunks::simple::MverChunk;
use crate::error::{FormatError, Result};

bitflags! {
    /// MPHD flags controlling map-wide terrain features
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MphdFlags: u32 {
        /// Map is WMO-only (no terrain)
        const WDT_USES_GLOBAL_MAP_OBJ = 0x0001;
        /// ADTs have vertex colors (MCCV chunks)
        const ADT_HAS_MCCV            = 0x0002;
        /// ADTs store 8-bit alpha maps
        const ADT_HAS_BIG_ALPHA       = 0x0004;
        /// Doodads are sorted by size category
        const ADT_HAS_DOODADREFS_SORTED_BY_SIZE_CAT = 0x0008;
        /// Use _h textures for height-based blending
        const ADT_HAS_HEIGHT_TEXTURING = 0x0080;
    }
}

/// MPHD chunk payload (32 bytes)
#[derive(Debug, Clone, Copy, BinRead)]
#[br(little)]
pub struct MphdChunk {
    /// Map flags
    #[br(map = MphdFlags::from_bits_retain)]
    pub flags: MphdFlags,

    /// Unknown, usually 0
    pub something: u32,

    /// Reserved (FileDataIDs in later clients)
    pub unused: [u32; 6],
}

impl MphdChunk {
    /// Payload size in bytes.
    pub const SIZE: usize = 32;
}

/// Parsed map descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDescriptor {
    /// Map name, the WDT file stem
    pub name: String,

    /// MPHD flags
    pub flags: MphdFlags,
}

impl MapDescriptor {
    /// Parse a WDT stream.
    ///
    /// After MVER, chunks are scanned in order until MPHD is found; anything
    /// else is skipped.
    ///
    /// # Errors
    ///
    /// - [`FormatError::UnsupportedVersion`] if MVER is not 18
    /// - [`FormatError::SizeMismatch`] if MPHD is not 32 bytes
    /// - [`FormatError::MissingChunk`] if the file ends without MPHD
    pub fn parse<R: Read + Seek>(name: impl Into<String>, reader: R) -> Result<Self> {
        let name = name.into();
        let mut reader = ChunkReader::new(reader)?;
        MverChunk::read_required(&mut reader)?;

        while let Some(header) = reader.next_header()? {
            if !header.is_chunk(ChunkId::MPHD) {
                log::debug!("{name}: skipping {} ({} bytes)", header.id, header.size);
                reader.skip(header)?;
                continue;
            }

            let chunk = reader.read_payload(header)?;
            chunk.expect_size(MphdChunk::SIZE)?;
            let mphd: MphdChunk = chunk.parse()?;
            log::debug!("{name}: MPHD flags {:#06x}", mphd.flags.bits());
            return Ok(Self {
                name,
                flags: mphd.flags,
            });
        }

        Err(FormatError::MissingChunk(ChunkId::MPHD))
    }

    /// Parse a WDT file, naming the map after the file stem.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = File::open(path)?;
        Self::parse(name, BufReader::new(file))
    }

    /// Whether tiles of this map use 8-bit alpha maps.
    pub fn has_big_alpha(&self) -> bool {
        self.flags.contains(MphdFlags::ADT_HAS_BIG_ALPHA)
    }

    /// Alpha mode for tiles of this map.
    pub fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::from_big_alpha(self.has_big_alpha())
    }
}

/// Map name -> alpha mode lookup, built from every WDT before tiles are read.
///
/// Built once, then only read; tile workers share it by reference.
#[derive(Debug, Clone, Default)]
pub struct MapAlphaTable {
    modes: HashMap<String, AlphaMode>,
}

impl MapAlphaTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a parsed descriptor. A later descriptor for the same map wins.
    pub fn insert(&mut self, descriptor: &MapDescriptor) {
        self.insert_mode(descriptor.name.clone(), descriptor.alpha_mode());
    }

    /// Record a mode directly.
    pub fn insert_mode(&mut self, name: impl Into<String>, mode: AlphaMode) {
        let name = name.into();
        if let Some(previous) = self.modes.insert(name.clone(), mode) {
            if previous != mode {
                log::warn!("Map {name}: alpha mode changed from {previous} to {mode}");
            }
        }
    }

    /// Mode recorded for `name`, if any.
    pub fn get(&self, name: &str) -> Option<AlphaMode> {
        self.modes.get(name).copied()
    }

    /// Mode for `name`, falling back to `default` for maps without a descriptor.
    pub fn mode_for(&self, name: &str, default: AlphaMode) -> AlphaMode {
        self.get(name).unwrap_or_else(|| {
            log::warn!(
                "No WDT for map {name}, using default {default} alpha; supply {name}.wdt if the output looks wrong"
            );
            default
        })
    }

    /// Number of maps.
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Whether no maps were recorded.
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Iterate over `(name, mode)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, AlphaMode)> {
        self.modes.iter().map(|(name, mode)| (name.as_str(), *mode))
    }
}
