//! Alpha map extraction command

use anyhow::{Result, bail};
use clap::Args;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use wow_alphamap::{
    AlphaMode, BatchOptions, BatchReport, PngExporter, build_alpha_table, process_tiles,
};

use crate::utils::{ProgressSink, collect_inputs, create_progress_bar};

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// ADT and WDT files, or directories to search recursively
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Assume 8-bit alpha maps for maps without a WDT
    #[arg(long, env = "ALPHAMAP_BIG_ALPHA")]
    pub big_alpha: bool,

    /// Output directory; images go to <OUTPUT>/<map>/
    #[arg(short, long, env = "ALPHAMAP_OUTPUT", default_value = "output")]
    pub output: PathBuf,

    /// Number of worker threads (default: number of CPUs)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Don't show a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

pub fn execute(args: ExtractArgs, quiet: bool) -> Result<()> {
    let start = Instant::now();

    let inputs = collect_inputs(&args.inputs)?;
    if inputs.tiles.is_empty() && inputs.descriptors.is_empty() {
        bail!("No .adt or .wdt files found in the given inputs");
    }

    let default_mode = AlphaMode::from_big_alpha(args.big_alpha);
    if !quiet {
        if args.big_alpha {
            println!("--big-alpha given, 8-bit alpha is the default for maps without a WDT");
        } else {
            println!("4-bit alpha is the default for maps without a WDT (use --big-alpha to change)");
        }
    }

    let mut report = BatchReport::default();
    let table = build_alpha_table(&inputs.descriptors, &mut report);
    if table.is_empty() && !inputs.tiles.is_empty() {
        log::warn!(
            "No WDT read; include the map's WDT to select its alpha format, or pass --big-alpha"
        );
    }
    for (map, mode) in table.iter() {
        log::info!("{map}: {mode} alpha");
    }

    let bar = (!quiet && !args.no_progress && !inputs.tiles.is_empty())
        .then(|| create_progress_bar(inputs.tiles.len() as u64, "Extracting alpha maps"));
    let sink = ProgressSink::new(PngExporter::new(&args.output), bar.clone());
    let options = BatchOptions {
        default_mode,
        threads: args.threads.unwrap_or(0),
    };
    report.merge(process_tiles(&inputs.tiles, &table, &options, &sink));

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    if !quiet {
        print_summary(&report, &args.output, start.elapsed());
    }

    if report.has_failures() {
        bail!("{} file(s) failed", report.failed());
    }
    Ok(())
}

fn print_summary(report: &BatchReport, output: &std::path::Path, elapsed: Duration) {
    println!();
    println!("Extraction Summary");
    println!("==================");
    println!(
        "Tiles:   {} processed, {} skipped, {} failed",
        report.processed,
        report.skipped,
        report.failed()
    );
    println!("Images:  {} written to {}", report.textures, output.display());
    println!("Time:    {:.2}s", elapsed.as_secs_f64());

    if report.has_failures() {
        println!();
        println!("Failed files ({}):", report.failed());
        for failure in &report.failures {
            println!("  ✗ {}: {}", failure.name(), failure.error);
        }
    }
}
