//! Input collection

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Kind of input file, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// WDT map descriptor
    Descriptor,
    /// ADT terrain tile
    Tile,
}

impl InputKind {
    /// Classify a path by its extension (case-insensitive).
    pub fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "wdt" => Some(Self::Descriptor),
            "adt" => Some(Self::Tile),
            _ => None,
        }
    }
}

/// Files found among the command line inputs
#[derive(Debug, Default)]
pub struct InputFiles {
    /// WDT files
    pub descriptors: Vec<PathBuf>,
    /// ADT files
    pub tiles: Vec<PathBuf>,
    /// Files with any other extension
    pub ignored: usize,
}

impl InputFiles {
    fn add(&mut self, path: PathBuf) {
        match InputKind::of(&path) {
            Some(InputKind::Descriptor) => self.descriptors.push(path),
            Some(InputKind::Tile) => self.tiles.push(path),
            None => {
                log::debug!("Skipping non .adt/.wdt file: {}", path.display());
                self.ignored += 1;
            }
        }
    }
}

/// Expand files and directories into WDT and ADT lists.
///
/// Directories are walked recursively in file name order.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<InputFiles> {
    let mut files = InputFiles::default();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() {
                    files.add(entry.into_path());
                }
            }
        } else if input.is_file() {
            files.add(input.clone());
        } else {
            bail!("Input not found: {}", input.display());
        }
    }
    Ok(files)
}
