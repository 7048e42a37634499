//! Chunk-level reading for ADT and WDT files.
//!
//! Every chunk in these formats follows the same 8-byte header: a 4-byte
//! reversed magic identifier and a 4-byte little-endian payload size. This
//! module provides the header type, an owned [`Chunk`] payload, and a
//! [`ChunkReader`] that walks chunks sequentially or seeks to absolute
//! offsets for index-driven access.
//!
//! # Binary Layout
//!
//! ```text
//! Offset | Size | Field | Description
//! -------|------|-------|------------------------------------------
//! 0x00   |  4   | id    | Chunk magic identifier (reversed)
//! 0x04   |  4   | size  | Payload size in bytes (excludes header)
//! 0x08   | size | data  | Payload
//! ```

use std::io::{Cursor, ErrorKind, Read, Seek, SeekFrom};

use binrw::{BinRead, Endian};

use crate::chunk_id::ChunkId;
use crate::error::{FormatError, Result};

/// Standard chunk header (8 bytes).
///
/// The size field is the byte count of the payload EXCLUDING the header, so
/// a chunk with `size = 100` occupies 108 bytes on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ChunkHeader {
    /// Chunk magic identifier (4 bytes, reversed)
    pub id: ChunkId,

    /// Size of chunk payload in bytes (excludes 8-byte header)
    pub size: u32,
}

impl ChunkHeader {
    /// Size of the header itself.
    pub const SIZE: u64 = 8;

    /// Total size including header (size + 8)
    #[must_use]
    pub const fn total_size(&self) -> u64 {
        self.size as u64 + Self::SIZE
    }

    /// Check if chunk ID matches expected value
    #[must_use]
    pub fn is_chunk(&self, expected: ChunkId) -> bool {
        self.id == expected
    }
}

/// A chunk payload read into memory.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Header as read from the file
    pub header: ChunkHeader,

    /// Absolute offset of the first payload byte
    pub offset: u64,

    /// Payload bytes, exactly `header.size` long
    pub data: Vec<u8>,
}

impl Chunk {
    /// Chunk identifier.
    pub fn id(&self) -> ChunkId {
        self.header.id
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Absolute offset of the chunk header (payload offset minus 8).
    pub fn start(&self) -> u64 {
        self.offset - ChunkHeader::SIZE
    }

    /// Fail with [`FormatError::SizeMismatch`] unless the payload is exactly `expected` bytes.
    pub fn expect_size(&self, expected: usize) -> Result<()> {
        if self.data.len() != expected {
            return Err(FormatError::SizeMismatch {
                chunk: self.header.id,
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Parse a fixed-layout record from the start of the payload.
    pub fn parse<T>(&self) -> Result<T>
    where
        T: for<'a> BinRead<Args<'a> = ()>,
    {
        let mut cursor = Cursor::new(self.data.as_slice());
        T::read_options(&mut cursor, Endian::Little, ())
            .map_err(|e| map_binrw_eof(e, "chunk record", self.data.len()))
    }

    /// Reader over this payload for nested subchunks.
    ///
    /// Positions inside the returned reader are payload-relative; offsets in
    /// its errors are reported as absolute file offsets.
    pub fn sub_reader(&self) -> ChunkReader<Cursor<&[u8]>> {
        ChunkReader {
            len: self.data.len() as u64,
            inner: Cursor::new(self.data.as_slice()),
            base: self.offset,
        }
    }
}

/// Sequential and random-access chunk reader.
///
/// There is no recovery: any mismatch aborts parsing of the current file.
#[derive(Debug)]
pub struct ChunkReader<R> {
    inner: R,
    len: u64,
    base: u64,
}

impl<R: Read + Seek> ChunkReader<R> {
    /// Wrap a reader; the stream length is measured once up front.
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self {
            inner,
            len,
            base: 0,
        })
    }

    /// Total stream length.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the stream is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current read position.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Reposition to an offset from the start of the stream.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        if offset > self.len {
            return Err(FormatError::TruncatedInput {
                context: "seek target",
                needed: usize::try_from(offset).unwrap_or(usize::MAX),
                available: usize::try_from(self.len).unwrap_or(usize::MAX),
            });
        }
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    fn remaining(&mut self) -> Result<u64> {
        Ok(self.len.saturating_sub(self.position()?))
    }

    /// Read the next chunk header, or `None` at a clean end of stream.
    pub fn next_header(&mut self) -> Result<Option<ChunkHeader>> {
        let remaining = self.remaining()?;
        if remaining == 0 {
            return Ok(None);
        }
        if remaining < ChunkHeader::SIZE {
            return Err(FormatError::TruncatedInput {
                context: "chunk header",
                needed: ChunkHeader::SIZE as usize,
                available: remaining as usize,
            });
        }
        let header = ChunkHeader::read_options(&mut self.inner, Endian::Little, ())
            .map_err(|e| map_binrw_eof(e, "chunk header", remaining as usize))?;
        Ok(Some(header))
    }

    /// Read a chunk header and check its identifier.
    pub fn expect_header(&mut self, id: ChunkId) -> Result<ChunkHeader> {
        let offset = self.base + self.position()?;
        let header = self.next_header()?.ok_or(FormatError::TruncatedInput {
            context: "chunk header",
            needed: ChunkHeader::SIZE as usize,
            available: 0,
        })?;
        if !header.is_chunk(id) {
            return Err(FormatError::BadMagic {
                expected: id,
                found: header.id,
                offset,
            });
        }
        Ok(header)
    }

    /// Read the payload that follows `header`.
    pub fn read_payload(&mut self, header: ChunkHeader) -> Result<Chunk> {
        let position = self.position()?;
        let remaining = self.remaining()?;
        if u64::from(header.size) > remaining {
            return Err(FormatError::TruncatedInput {
                context: "chunk payload",
                needed: header.size as usize,
                available: remaining as usize,
            });
        }
        let mut data = vec![0u8; header.size as usize];
        self.inner.read_exact(&mut data)?;
        Ok(Chunk {
            header,
            offset: self.base + position,
            data,
        })
    }

    /// Read a complete chunk, failing with [`FormatError::BadMagic`] on the wrong tag.
    pub fn expect(&mut self, id: ChunkId) -> Result<Chunk> {
        let header = self.expect_header(id)?;
        self.read_payload(header)
    }

    /// Skip the payload that follows `header`.
    pub fn skip(&mut self, header: ChunkHeader) -> Result<()> {
        let target = self.position()? + u64::from(header.size);
        self.seek(target)
    }

    /// Consume the reader, returning the wrapped stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

fn map_binrw_eof(err: binrw::Error, context: &'static str, available: usize) -> FormatError {
    match err {
        binrw::Error::Io(io) if io.kind() == ErrorKind::UnexpectedEof => {
            FormatError::TruncatedInput {
                context,
                needed: available + 1,
                available,
            }
        }
        other => other.into(),
    }
}
