//! Integration tests for batch processing

use pretty_assertions::assert_eq;
use std::sync::Mutex;
use tempfile::TempDir;
use wow_alphamap::{
    AlphaMode, BatchOptions, BatchReport, FormatError, TileAlphaMaps, TileName, build_alpha_table,
    process_tiles,
};

use crate::common::{AdtBuilder, Layer, wdt, write_file};

/// Tile with one 8-bit alpha layer over a base layer in sub-chunk (0, 0).
fn wide_tile() -> AdtBuilder {
    AdtBuilder::new(["Grass.blp", "Rock.blp"])
        .layers(0, 0, vec![Layer::base(0), Layer::alpha(1, vec![60; 4096])])
}

#[test]
fn run_continues_past_broken_files() {
    let dir = TempDir::new().unwrap();
    let wdts = vec![
        write_file(dir.path(), "Northrend.wdt", &wdt(18, 0x04)),
        write_file(dir.path(), "Broken.wdt", &wdt(17, 0x04)),
    ];
    let tiles = vec![
        wide_tile().write(dir.path(), "Northrend_30_20.adt"),
        AdtBuilder::new(Vec::<String>::new()).write(dir.path(), "Northrend_30_21.adt"),
        wide_tile().version(17).write(dir.path(), "Northrend_30_22.adt"),
        wide_tile().write(dir.path(), "Northrend_31_20.adt"),
    ];

    let mut report = BatchReport::default();
    let table = build_alpha_table(&wdts, &mut report);
    assert_eq!(table.len(), 1);
    assert_eq!(report.failed(), 1);

    let written = Mutex::new(Vec::new());
    let sink = |name: &TileName, maps: TileAlphaMaps| -> wow_alphamap::Result<()> {
        assert_eq!(maps.canvases[1].get(0, 0), 60);
        assert_eq!(maps.canvases[0].get(0, 0), 195);
        written.lock().unwrap().push(name.to_string());
        Ok(())
    };
    let options = BatchOptions {
        default_mode: AlphaMode::Narrow4Bit,
        threads: 2,
    };
    report.merge(process_tiles(&tiles, &table, &options, &sink));

    assert_eq!(report.processed, 2);
    assert_eq!(report.textures, 4);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed(), 2);

    let names: Vec<String> = report.failures.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["Broken", "Northrend_30_22"]);
    assert!(matches!(
        report.failures[1].error,
        FormatError::UnsupportedVersion(17)
    ));

    let mut written = written.into_inner().unwrap();
    written.sort();
    assert_eq!(written, vec!["Northrend_30_20", "Northrend_31_20"]);
}

#[test]
fn unknown_map_uses_default_mode() {
    let dir = TempDir::new().unwrap();
    let tiles = vec![wide_tile().write(dir.path(), "Unknown_1_1.adt")];
    let table = build_alpha_table::<&str>(&[], &mut BatchReport::default());
    let sink = |_: &TileName, _: TileAlphaMaps| -> wow_alphamap::Result<()> { Ok(()) };

    // 2048 stored bytes only fit 4-bit mode
    let narrow = vec![
        AdtBuilder::new(["a.blp", "b.blp"])
            .layers(0, 0, vec![Layer::base(0), Layer::alpha(1, vec![0; 2048])])
            .write(dir.path(), "Unknown_1_2.adt"),
    ];

    let wide = BatchOptions {
        default_mode: AlphaMode::Wide8Bit,
        threads: 0,
    };
    let report = process_tiles(&tiles, &table, &wide, &sink);
    assert_eq!(report.processed, 1);

    let report = process_tiles(&narrow, &table, &wide, &sink);
    assert_eq!(report.failed(), 1);

    let report = process_tiles(&narrow, &table, &BatchOptions::default(), &sink);
    assert_eq!(report.processed, 1);
}

#[test]
fn sink_errors_are_failures() {
    let dir = TempDir::new().unwrap();
    let tiles = vec![wide_tile().write(dir.path(), "Map_0_0.adt")];
    let mut table = wow_alphamap::MapAlphaTable::new();
    table.insert_mode("Map", AlphaMode::Wide8Bit);

    let sink = |_: &TileName, _: TileAlphaMaps| -> wow_alphamap::Result<()> {
        Err(std::io::Error::other("disk full").into())
    };
    let report = process_tiles(&tiles, &table, &BatchOptions::default(), &sink);
    assert_eq!(report.processed, 0);
    assert!(matches!(report.failures[0].error, FormatError::Io(_)));
}

#[cfg(feature = "export")]
#[test]
fn export_writes_pngs_per_map() {
    use wow_alphamap::PngExporter;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("output");
    let tiles = vec![wide_tile().write(dir.path(), "Northrend_30_20.adt")];
    let mut table = wow_alphamap::MapAlphaTable::new();
    table.insert_mode("Northrend", AlphaMode::Wide8Bit);

    let report = process_tiles(
        &tiles,
        &table,
        &BatchOptions::default(),
        &PngExporter::new(&out),
    );
    assert_eq!(report.processed, 1);
    assert!(out.join("Northrend").join("Northrend_30_20-Grass.png").exists());
    assert!(out.join("Northrend").join("Northrend_30_20-Rock.png").exists());
}
