//! Batch extraction over many WDT and ADT files.
//!
//! A run has two phases. All map descriptors are parsed first into a
//! [`MapAlphaTable`], which is then frozen and shared read-only. Tiles are
//! processed afterwards, in parallel when the `parallel` feature is enabled;
//! each tile owns its canvases and produces one [`TileOutcome`]. Outcomes are
//! merged into a [`BatchReport`] after all tiles are done.
//!
//! A broken file never stops the run; it is recorded as a [`FileFailure`].

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::chunks::AlphaMode;
use crate::error::{FormatError, Result};
use crate::map_descriptor::{MapAlphaTable, MapDescriptor};
use crate::tile::{TileAlphaMaps, TileName, TileParser};

/// Options for a batch run
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Alpha mode for maps without a descriptor
    pub default_mode: AlphaMode,
    /// Worker threads for tile processing (0 = auto). Ignored without `parallel`.
    pub threads: usize,
}

/// Receiver for decoded tiles.
///
/// Called from worker threads when the `parallel` feature is enabled.
pub trait TileSink: Sync {
    /// Consume the canvases of one successfully decoded tile.
    fn write_tile(&self, name: &TileName, maps: TileAlphaMaps) -> Result<()>;

    /// Notification that a tile has been handled, whatever the outcome.
    fn finished(&self, _path: &Path, _outcome: &TileOutcome) {}
}

impl<F> TileSink for F
where
    F: Fn(&TileName, TileAlphaMaps) -> Result<()> + Sync,
{
    fn write_tile(&self, name: &TileName, maps: TileAlphaMaps) -> Result<()> {
        self(name, maps)
    }
}

/// Result of processing one file.
#[derive(Debug)]
pub enum TileOutcome {
    /// Tile decoded and handed to the sink
    Processed {
        /// Number of texture canvases produced
        textures: usize,
    },
    /// Nothing to produce (no textures)
    Skipped,
    /// File could not be processed
    Failed(FormatError),
}

/// A file that could not be processed.
#[derive(Debug)]
pub struct FileFailure {
    /// Path of the file
    pub path: PathBuf,
    /// What went wrong
    pub error: FormatError,
}

impl FileFailure {
    /// File name without directory or extension.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

/// Aggregate result of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files processed successfully
    pub processed: usize,
    /// Canvases handed to the sink
    pub textures: usize,
    /// Files skipped because they had nothing to produce
    pub skipped: usize,
    /// Files that failed
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    /// Number of failed files.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Whether any file failed.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Record a failure.
    pub fn record_failure(&mut self, path: impl Into<PathBuf>, error: FormatError) {
        self.failures.push(FileFailure {
            path: path.into(),
            error,
        });
    }

    /// Fold one tile outcome into the report.
    pub fn record(&mut self, path: impl Into<PathBuf>, outcome: TileOutcome) {
        match outcome {
            TileOutcome::Processed { textures } => {
                self.processed += 1;
                self.textures += textures;
            }
            TileOutcome::Skipped => self.skipped += 1,
            TileOutcome::Failed(error) => self.record_failure(path, error),
        }
    }

    /// Append another report.
    pub fn merge(&mut self, other: BatchReport) {
        self.processed += other.processed;
        self.textures += other.textures;
        self.skipped += other.skipped;
        self.failures.extend(other.failures);
    }
}

/// Parse every map descriptor into a table.
///
/// Descriptors that fail to parse are recorded in `report` and contribute no
/// entry; their tiles fall back to the default mode.
pub fn build_alpha_table<P: AsRef<Path>>(
    descriptors: &[P],
    report: &mut BatchReport,
) -> MapAlphaTable {
    let mut table = MapAlphaTable::new();
    for path in descriptors {
        let path = path.as_ref();
        match MapDescriptor::from_path(path) {
            Ok(descriptor) => {
                log::info!(
                    "Map {} uses {} alpha maps",
                    descriptor.name,
                    descriptor.alpha_mode()
                );
                table.insert(&descriptor);
            }
            Err(e) => {
                log::warn!("Failed to read {}: {e}", path.display());
                report.record_failure(path, e);
            }
        }
    }
    table
}

/// Decode one tile and hand it to `sink`.
pub fn process_tile<S: TileSink + ?Sized>(
    path: &Path,
    table: &MapAlphaTable,
    options: &BatchOptions,
    sink: &S,
) -> TileOutcome {
    let result = TileName::from_path(path).and_then(|name| {
        let mode = table.mode_for(&name.map, options.default_mode);
        let maps = TileParser::new(mode).parse_file(path)?;
        let textures = maps.canvases.len();
        sink.write_tile(&name, maps)?;
        Ok(textures)
    });

    match result {
        Ok(textures) => {
            log::info!("{}: {textures} alpha maps", path.display());
            TileOutcome::Processed { textures }
        }
        Err(e) if e.is_skip() => {
            log::info!("{}: skipped ({e})", path.display());
            TileOutcome::Skipped
        }
        Err(e) => {
            log::warn!("Failed to read {}: {e}", path.display());
            TileOutcome::Failed(e)
        }
    }
}

/// Process every tile against a frozen table.
///
/// Each tile yields its own outcome; outcomes are merged into the report in
/// input order once all tiles are done.
pub fn process_tiles<P, S>(
    tiles: &[P],
    table: &MapAlphaTable,
    options: &BatchOptions,
    sink: &S,
) -> BatchReport
where
    P: AsRef<Path> + Sync,
    S: TileSink + ?Sized,
{
    let handle = |path: &P| {
        let path = path.as_ref();
        let outcome = process_tile(path, table, options, sink);
        sink.finished(path, &outcome);
        (path.to_path_buf(), outcome)
    };

    let outcomes = run_tasks(tiles, options.threads, handle);

    let mut report = BatchReport::default();
    for (path, outcome) in outcomes {
        report.record(path, outcome);
    }
    report
}

#[cfg(feature = "parallel")]
fn run_tasks<P, T, F>(items: &[P], threads: usize, task: F) -> Vec<T>
where
    P: Sync,
    T: Send,
    F: Fn(&P) -> T + Sync + Send,
{
    let run = || items.par_iter().map(&task).collect();
    if threads == 0 {
        return run();
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(run),
        Err(e) => {
            log::warn!("Failed to configure thread pool ({e}), using the default pool");
            run()
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn run_tasks<P, T, F>(items: &[P], _threads: usize, task: F) -> Vec<T>
where
    F: Fn(&P) -> T,
{
    items.iter().map(task).collect()
}
