//! Progress bar utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use wow_alphamap::{TileAlphaMaps, TileName, TileOutcome, TileSink};

/// Create a standard progress bar
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Tile sink that advances a progress bar as tiles finish
pub struct ProgressSink<S> {
    inner: S,
    bar: Option<ProgressBar>,
}

impl<S> ProgressSink<S> {
    pub fn new(inner: S, bar: Option<ProgressBar>) -> Self {
        Self { inner, bar }
    }
}

impl<S: TileSink> TileSink for ProgressSink<S> {
    fn write_tile(&self, name: &TileName, maps: TileAlphaMaps) -> wow_alphamap::Result<()> {
        self.inner.write_tile(name, maps)
    }

    fn finished(&self, path: &Path, outcome: &TileOutcome) {
        let Some(bar) = &self.bar else {
            return;
        };
        if let TileOutcome::Failed(e) = outcome {
            bar.println(format!("✗ {}: {e}", path.display()));
        }
        bar.inc(1);
    }
}
