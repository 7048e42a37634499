use binrw::BinRead;

/// 4-byte chunk identifier (magic bytes).
///
/// ADT and WDT files store chunk identifiers back-to-front. When documentation
/// refers to a chunk as "MVER", the bytes on disk are `[0x52, 0x45, 0x56, 0x4D]`
/// ("REVM" in ASCII). The constants below are the on-disk byte sequences, so a
/// header read straight from the file can be compared against them directly.
///
/// # File Format Example
///
/// Documentation: "MCNK" chunk
/// File bytes: `[0x4B, 0x4E, 0x43, 0x4D]`
/// ASCII interpretation: "KNCM"
/// Display: "MCNK" (after reversal)
///
/// # Usage
///
/// ```rust
/// use wow_alphamap::ChunkId;
///
/// assert_eq!(ChunkId::MVER.as_str(), "MVER");
/// assert_eq!(ChunkId::from_str("MCNK"), Some(ChunkId::MCNK));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, BinRead)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    // Shared by ADT and WDT files

    /// Version chunk - format version number (always 18)
    pub const MVER: Self = Self(*b"REVM");

    // WDT (map descriptor) chunks

    /// Map header - global map flags, including the big alpha bit
    pub const MPHD: Self = Self(*b"DHPM");

    // ADT (terrain tile) root chunks

    /// Header chunk - offsets to other chunks, relative to its own payload
    pub const MHDR: Self = Self(*b"RDHM");

    /// Chunk index - absolute MCNK offsets for the 16x16 grid
    pub const MCIN: Self = Self(*b"NICM");

    /// Texture filenames - null-terminated strings
    pub const MTEX: Self = Self(*b"XETM");

    /// Terrain sub-chunk - one cell of the 16x16 grid
    pub const MCNK: Self = Self(*b"KNCM");

    // MCNK subchunks

    /// Texture layers - 16 bytes per layer
    pub const MCLY: Self = Self(*b"YLCM");

    /// Alpha maps - per-layer blend masks
    pub const MCAL: Self = Self(*b"LACM");

    /// Convert to human-readable string.
    ///
    /// Reverses the stored bytes to display the chunk name as it appears
    /// in documentation.
    #[must_use]
    pub fn as_str(&self) -> String {
        let reversed = [self.0[3], self.0[2], self.0[1], self.0[0]];
        String::from_utf8_lossy(&reversed).to_string()
    }

    /// Create from a documented name (reverses bytes for file storage).
    ///
    /// Returns `None` unless the name is exactly 4 bytes long.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match *s.as_bytes() {
            [a, b, c, d] => Some(Self([d, c, b, a])),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
