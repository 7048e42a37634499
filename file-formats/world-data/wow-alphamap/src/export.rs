// export.rs - Write alpha canvases as grayscale PNG images

use std::fs;
use std::path::{Path, PathBuf};

use image::GrayImage;

use crate::batch::TileSink;
use crate::compositor::Canvas;
use crate::error::{FormatError, Result};
use crate::tile::{TileAlphaMaps, TileName};

/// Texture file name without directories or extension.
///
/// Both `\` and `/` are treated as separators, since MTEX paths use
/// backslashes.
///
/// ```
/// use wow_alphamap::export::texture_basename;
///
/// assert_eq!(texture_basename("Tileset\\Elwynn\\ElwynnGrass.blp"), "ElwynnGrass");
/// ```
pub fn texture_basename(texture: &str) -> &str {
    let file = texture.rsplit(['\\', '/']).next().unwrap_or(texture);
    match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    }
}

/// Output file name for one texture of a tile: `<map>_<x>_<y>-<texture>.png`.
pub fn image_file_name(tile: &TileName, texture: &str) -> String {
    format!("{tile}-{}.png", texture_basename(texture))
}

/// Convert a canvas to an 8-bit grayscale image, reusing its pixel buffer.
pub fn canvas_to_image(canvas: Canvas) -> Result<GrayImage> {
    let size = Canvas::SIZE as u32;
    let pixels = canvas.into_vec();
    let available = pixels.len();
    GrayImage::from_raw(size, size, pixels).ok_or(FormatError::TruncatedInput {
        context: "canvas pixels",
        needed: Canvas::SIZE * Canvas::SIZE,
        available,
    })
}

/// Writes every canvas of a tile to `<output_dir>/<map>/`.
#[derive(Debug, Clone)]
pub struct PngExporter {
    output_dir: PathBuf,
}

impl PngExporter {
    /// Exporter rooted at `output_dir`.
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Root output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Directory holding the images of one map.
    pub fn map_dir(&self, tile: &TileName) -> PathBuf {
        self.output_dir.join(&tile.map)
    }

    /// Write one PNG per texture and return the written paths.
    ///
    /// The canvases are consumed; each one becomes the backing buffer of
    /// its image.
    pub fn export_tile(&self, tile: &TileName, maps: TileAlphaMaps) -> Result<Vec<PathBuf>> {
        let dir = self.map_dir(tile);
        fs::create_dir_all(&dir)?;

        let mut written = Vec::with_capacity(maps.canvases.len());
        for (texture, canvas) in maps.textures.iter().zip(maps.canvases) {
            let path = dir.join(image_file_name(tile, texture));
            canvas_to_image(canvas)?.save(&path)?;
            log::debug!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

impl TileSink for PngExporter {
    fn write_tile(&self, name: &TileName, maps: TileAlphaMaps) -> Result<()> {
        self.export_tile(name, maps).map(|_| ())
    }
}
