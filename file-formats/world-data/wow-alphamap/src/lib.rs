//! Alpha map extraction for World of Warcraft ADT terrain tiles
//!
//! Terrain tiles blend several ground textures per 64×64 sub-chunk. Every
//! texture after the first stores an alpha map; the first (base) texture
//! gets whatever coverage the others leave. This crate decodes those alpha
//! maps and assembles one 1024×1024 grayscale mask per texture for a whole
//! tile, reconstructing the base layer's implicit mask along the way.
//!
//! ## Features
//!
//! - Chunk-level reader with reversed tag constants and bounded payloads
//! - WDT map descriptor parsing for the map-wide alpha mode
//! - 4-bit packed, 8-bit raw and 8-bit RLE alpha map decoding
//! - Edge-artifact correction for 4-bit alpha maps
//! - Fail-fast per file batch processing with a failure report
//! - Parallel tile processing (with `parallel` feature)
//! - PNG export (with `export` feature)
//!
//! ## Example
//!
//! ```no_run
//! use wow_alphamap::{AlphaMode, MapAlphaTable, MapDescriptor, TileName, TileParser};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut table = MapAlphaTable::new();
//! table.insert(&MapDescriptor::from_path("Azeroth.wdt")?);
//!
//! let tile = TileName::from_path("Azeroth_32_48.adt")?;
//! let mode = table.mode_for(&tile.map, AlphaMode::Narrow4Bit);
//! let maps = TileParser::new(mode).parse_file("Azeroth_32_48.adt")?;
//!
//! for (texture, canvas) in maps.iter() {
//!     println!("{texture}: {} px covered", canvas.as_bytes().iter().filter(|&&a| a > 0).count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## References
//!
//! - <https://wowdev.wiki/ADT/v18>
//! - <https://wowdev.wiki/WDT>

pub mod batch;
pub mod chunk_id;
pub mod chunk_reader;
pub mod chunks;
pub mod compositor;
pub mod error;
pub mod map_descriptor;
pub mod tile;

#[cfg(feature = "export")]
pub mod export;

pub use batch::{
    BatchOptions, BatchReport, FileFailure, TileOutcome, TileSink, build_alpha_table,
    process_tile, process_tiles,
};
pub use chunk_id::ChunkId;
pub use chunk_reader::{Chunk, ChunkHeader, ChunkReader};
pub use chunks::{AlphaBlock, AlphaMode, decode_alpha_layer};
pub use compositor::{BaseLayerAccumulator, Canvas, Compositor};
pub use error::{FormatError, Result};
pub use map_descriptor::{MapAlphaTable, MapDescriptor, MphdFlags};
pub use tile::{TileAlphaMaps, TileName, TileParser};

#[cfg(feature = "export")]
pub use export::PngExporter;
