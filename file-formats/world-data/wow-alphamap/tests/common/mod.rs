//! Synthetic ADT and WDT files for integration tests.
//!
//! Tiles are laid out the way the client writes them: MVER, MHDR, MTEX,
//! MCIN, then the 256 MCNKs in row-major order. Each MCNK has a 128-byte
//! header followed by MCLY and MCAL.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const MCLY_USE_ALPHA: u32 = 0x100;
pub const MCLY_COMPRESSED: u32 = 0x200;
pub const MCNK_DO_NOT_FIX_ALPHA: u32 = 0x8000;

const MCNK_HEADER_SIZE: usize = 128;

fn chunk(magic: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut data = magic.to_vec();
    data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    data.extend_from_slice(payload);
    data
}

fn put_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// One MCLY entry plus its stored alpha bytes.
#[derive(Debug, Clone)]
pub struct Layer {
    pub texture_id: u32,
    pub flags: u32,
    pub alpha: Vec<u8>,
}

impl Layer {
    /// Base layer without alpha map.
    pub fn base(texture_id: u32) -> Self {
        Self {
            texture_id,
            flags: 0,
            alpha: Vec::new(),
        }
    }

    /// Layer with an uncompressed alpha map (2048 or 4096 bytes).
    pub fn alpha(texture_id: u32, alpha: Vec<u8>) -> Self {
        Self {
            texture_id,
            flags: MCLY_USE_ALPHA,
            alpha,
        }
    }

    /// Layer with an RLE compressed alpha map.
    pub fn compressed(texture_id: u32, alpha: Vec<u8>) -> Self {
        Self {
            texture_id,
            flags: MCLY_USE_ALPHA | MCLY_COMPRESSED,
            alpha,
        }
    }
}

/// One MCNK.
#[derive(Debug, Clone, Default)]
pub struct SubChunk {
    pub flags: u32,
    pub index: Option<(u32, u32)>,
    pub layers: Vec<Layer>,
}

/// Builder for root ADT files.
#[derive(Debug, Clone)]
pub struct AdtBuilder {
    version: u32,
    textures: Vec<String>,
    chunks: Vec<SubChunk>,
    mcin_size_adjust: i32,
}

impl AdtBuilder {
    pub fn new<S: Into<String>>(textures: impl IntoIterator<Item = S>) -> Self {
        Self {
            version: 18,
            textures: textures.into_iter().map(Into::into).collect(),
            chunks: vec![SubChunk::default(); 256],
            mcin_size_adjust: 0,
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Layers of sub-chunk (x, y).
    pub fn layers(mut self, x: usize, y: usize, layers: Vec<Layer>) -> Self {
        self.chunks[y * 16 + x].layers = layers;
        self
    }

    /// MCNK flags of sub-chunk (x, y).
    pub fn mcnk_flags(mut self, x: usize, y: usize, flags: u32) -> Self {
        self.chunks[y * 16 + x].flags = flags;
        self
    }

    /// Override the index stored in the MCNK header of sub-chunk (x, y).
    pub fn stored_index(mut self, x: usize, y: usize, index: (u32, u32)) -> Self {
        self.chunks[y * 16 + x].index = Some(index);
        self
    }

    /// Make every MCIN size disagree with its MCNK by `delta` bytes.
    pub fn mcin_size_adjust(mut self, delta: i32) -> Self {
        self.mcin_size_adjust = delta;
        self
    }

    fn mcnk(x: usize, y: usize, sub: &SubChunk) -> Vec<u8> {
        let n = sub.layers.len();
        let (index_x, index_y) = sub.index.unwrap_or((x as u32, y as u32));

        let mut mcly = Vec::with_capacity(n * 16);
        let mut mcal = Vec::new();
        for layer in &sub.layers {
            mcly.extend_from_slice(&layer.texture_id.to_le_bytes());
            mcly.extend_from_slice(&layer.flags.to_le_bytes());
            mcly.extend_from_slice(&(mcal.len() as u32).to_le_bytes());
            mcly.extend_from_slice(&0u32.to_le_bytes());
            mcal.extend_from_slice(&layer.alpha);
        }

        // Offsets are relative to the MCNK header
        let ofs_layer = 8 + MCNK_HEADER_SIZE;
        let ofs_alpha = ofs_layer + 8 + mcly.len();

        let mut payload = vec![0u8; MCNK_HEADER_SIZE];
        put_u32(&mut payload, 0x00, sub.flags);
        put_u32(&mut payload, 0x04, index_x);
        put_u32(&mut payload, 0x08, index_y);
        put_u32(&mut payload, 0x0C, n as u32);
        put_u32(&mut payload, 0x1C, ofs_layer as u32);
        put_u32(&mut payload, 0x24, ofs_alpha as u32);
        put_u32(&mut payload, 0x28, (mcal.len() + 8) as u32);

        payload.extend_from_slice(&chunk(b"YLCM", &mcly));
        payload.extend_from_slice(&chunk(b"LACM", &mcal));
        payload
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = chunk(b"REVM", &self.version.to_le_bytes());

        let mhdr_payload_start = data.len() + 8;
        data.extend_from_slice(&chunk(b"RDHM", &[0; 64]));

        let mtex_offset = data.len() - mhdr_payload_start;
        let mut names = Vec::new();
        for name in &self.textures {
            names.extend_from_slice(name.as_bytes());
            names.push(0);
        }
        data.extend_from_slice(&chunk(b"XETM", &names));

        let mcin_offset = data.len() - mhdr_payload_start;
        let mcin_payload_start = data.len() + 8;
        data.extend_from_slice(&chunk(b"NICM", &[0; 4096]));

        for y in 0..16 {
            for x in 0..16 {
                let i = y * 16 + x;
                let payload = Self::mcnk(x, y, &self.chunks[i]);
                let offset = data.len() as u32;
                let size = (payload.len() as i32 + 8 + self.mcin_size_adjust) as u32;
                put_u32(&mut data, mcin_payload_start + i * 16, offset);
                put_u32(&mut data, mcin_payload_start + i * 16 + 4, size);
                data.extend_from_slice(&chunk(b"KNCM", &payload));
            }
        }

        put_u32(&mut data, mhdr_payload_start + 4, mcin_offset as u32);
        put_u32(&mut data, mhdr_payload_start + 8, mtex_offset as u32);
        data
    }

    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        write_file(dir, name, &self.build())
    }
}

/// WDT with MVER, MPHD and an empty MAIN.
pub fn wdt(version: u32, mphd_flags: u32) -> Vec<u8> {
    let mut data = chunk(b"REVM", &version.to_le_bytes());
    let mut mphd = vec![0u8; 32];
    put_u32(&mut mphd, 0, mphd_flags);
    data.extend_from_slice(&chunk(b"DHPM", &mphd));
    data.extend_from_slice(&chunk(b"NIAM", &[0; 64]));
    data
}

pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

/// RLE stream filling `count` texels with `value`.
pub fn rle_fill(mut count: usize, value: u8) -> Vec<u8> {
    let mut data = Vec::new();
    while count > 0 {
        let n = count.min(127);
        data.extend_from_slice(&[0x80 | n as u8, value]);
        count -= n;
    }
    data
}
