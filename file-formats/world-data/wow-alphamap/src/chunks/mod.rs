//! Fixed-layout chunk records.
//!
//! Each record is a plain struct parsed with `binrw` from a [`Chunk`](crate::Chunk)
//! payload. Only the chunks involved in locating and decoding alpha maps are
//! modelled.

pub mod mcal;
pub mod mcly;
pub mod mcnk;
pub mod simple;
pub mod strings;

pub use mcal::{AlphaBlock, AlphaMode, decode_alpha_layer, decompress_rle, expand_nibble};
pub use mcly::{MclyChunk, MclyFlags, MclyLayer};
pub use mcnk::{McnkFlags, McnkHeader};
pub use simple::{FORMAT_VERSION, McinChunk, McinEntry, MhdrChunk, MverChunk};
pub use strings::MtexChunk;
