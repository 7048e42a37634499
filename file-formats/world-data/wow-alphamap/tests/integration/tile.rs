//! Integration tests for tile parsing and composition

use pretty_assertions::assert_eq;
use std::io::Cursor;
use wow_alphamap::{AlphaMode, Canvas, FormatError, TileAlphaMaps, TileParser};

use crate::common::{AdtBuilder, Layer, MCNK_DO_NOT_FIX_ALPHA, rle_fill};

fn parse(builder: &AdtBuilder, mode: AlphaMode) -> Result<TileAlphaMaps, FormatError> {
    TileParser::new(mode).parse(Cursor::new(builder.build()))
}

/// Every pixel of the 64×64 region of sub-chunk (x, y).
fn region(canvas: &Canvas, x: usize, y: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(4096);
    for py in y * 64..(y + 1) * 64 {
        for px in x * 64..(x + 1) * 64 {
            pixels.push(canvas.get(px, py));
        }
    }
    pixels
}

fn covered(canvas: &Canvas) -> usize {
    canvas.as_bytes().iter().filter(|&&v| v != 0).count()
}

#[test]
fn base_layer_only_fills_its_region() {
    let adt = AdtBuilder::new(["Tileset\\Grass.blp"]).layers(0, 0, vec![Layer::base(0)]);

    let maps = parse(&adt, AlphaMode::Narrow4Bit).unwrap();
    assert_eq!(maps.textures, vec!["Tileset\\Grass.blp"]);
    assert_eq!(maps.canvases.len(), 1);

    let canvas = &maps.canvases[0];
    assert!(region(canvas, 0, 0).iter().all(|&v| v == 255));
    assert_eq!(covered(canvas), 4096);
    assert_eq!(canvas.get(64, 0), 0);
    assert_eq!(canvas.get(0, 64), 0);
}

#[test]
fn base_layer_is_what_the_alpha_layer_leaves() {
    let adt = AdtBuilder::new(["Grass.blp", "Rock.blp"])
        .layers(0, 0, vec![Layer::base(0), Layer::alpha(1, vec![100; 4096])]);

    let maps = parse(&adt, AlphaMode::Wide8Bit).unwrap();
    assert!(region(&maps.canvases[1], 0, 0).iter().all(|&v| v == 100));
    assert!(region(&maps.canvases[0], 0, 0).iter().all(|&v| v == 155));
    assert_eq!(covered(&maps.canvases[0]), 4096);
    assert_eq!(covered(&maps.canvases[1]), 4096);
}

#[test]
fn subchunk_position_maps_to_canvas_region() {
    let adt = AdtBuilder::new(["Grass.blp", "Rock.blp"])
        .layers(3, 5, vec![Layer::base(1), Layer::alpha(0, vec![40; 4096])]);

    let maps = parse(&adt, AlphaMode::Wide8Bit).unwrap();
    assert!(region(&maps.canvases[0], 3, 5).iter().all(|&v| v == 40));
    assert!(region(&maps.canvases[1], 3, 5).iter().all(|&v| v == 215));
    assert_eq!(maps.canvases[0].get(192, 320), 40);
    assert_eq!(maps.canvases[0].get(191, 320), 0);
    assert_eq!(covered(&maps.canvases[1]), 4096);
}

#[test]
fn overlapping_layers_floor_base_at_zero() {
    let adt = AdtBuilder::new(["a.blp", "b.blp", "c.blp"]).layers(
        1,
        0,
        vec![
            Layer::base(0),
            Layer::alpha(1, vec![200; 4096]),
            Layer::alpha(2, vec![100; 4096]),
        ],
    );

    let maps = parse(&adt, AlphaMode::Wide8Bit).unwrap();
    assert!(region(&maps.canvases[0], 1, 0).iter().all(|&v| v == 0));
    assert!(region(&maps.canvases[1], 1, 0).iter().all(|&v| v == 200));
    assert!(region(&maps.canvases[2], 1, 0).iter().all(|&v| v == 100));
}

#[test]
fn narrow_alpha_with_edge_fix() {
    // Every texel 0x3 except the last column and last row, which hold 0xF
    let mut alpha = vec![0x33u8; 2048];
    for row in 0..64 {
        alpha[row * 32 + 31] = 0xF3;
    }
    for byte in &mut alpha[63 * 32..] {
        *byte = 0xFF;
    }

    let adt = AdtBuilder::new(["a.blp", "b.blp"])
        .layers(0, 0, vec![Layer::base(0), Layer::alpha(1, alpha.clone())])
        .layers(1, 0, vec![Layer::base(0), Layer::alpha(1, alpha)])
        .mcnk_flags(1, 0, MCNK_DO_NOT_FIX_ALPHA);

    let maps = parse(&adt, AlphaMode::Narrow4Bit).unwrap();
    let layer = &maps.canvases[1];

    // (0, 0) is fixed: the unreliable edge takes the neighbouring values
    assert!(region(layer, 0, 0).iter().all(|&v| v == 0x33));
    assert!(region(&maps.canvases[0], 0, 0).iter().all(|&v| v == 255 - 0x33));

    // (1, 0) keeps its stored edge
    assert_eq!(layer.get(64, 0), 0x33);
    assert_eq!(layer.get(64 + 63, 0), 0xFF);
    assert_eq!(layer.get(64, 63), 0xFF);
}

#[test]
fn compressed_wide_alpha() {
    let mut rle = vec![0x83, 0x05];
    rle.extend(rle_fill(4096 - 3, 80));

    let adt = AdtBuilder::new(["a.blp", "b.blp"])
        .layers(0, 0, vec![Layer::base(0), Layer::compressed(1, rle)]);

    let maps = parse(&adt, AlphaMode::Wide8Bit).unwrap();
    let layer = &maps.canvases[1];
    assert_eq!(layer.get(0, 0), 5);
    assert_eq!(layer.get(2, 0), 5);
    assert_eq!(layer.get(3, 0), 80);
    assert_eq!(layer.get(63, 63), 80);
    assert_eq!(maps.canvases[0].get(0, 0), 250);
    assert_eq!(maps.canvases[0].get(3, 0), 175);
}

#[test]
fn truncated_rle_stream() {
    let adt = AdtBuilder::new(["a.blp", "b.blp"])
        .layers(0, 0, vec![Layer::base(0), Layer::compressed(1, rle_fill(2000, 1))]);

    let err = parse(&adt, AlphaMode::Wide8Bit).unwrap_err();
    assert!(matches!(
        err,
        FormatError::TruncatedInput {
            needed: 4096,
            available: 2000,
            ..
        }
    ));
}

#[test]
fn index_mismatch() {
    let adt = AdtBuilder::new(["a.blp"]).stored_index(2, 1, (1, 2));

    let err = parse(&adt, AlphaMode::Narrow4Bit).unwrap_err();
    assert!(matches!(
        err,
        FormatError::IndexMismatch {
            expected: (2, 1),
            found: (1, 2),
        }
    ));
}

#[test]
fn base_layer_with_alpha_is_rejected() {
    let adt = AdtBuilder::new(["a.blp"]).layers(4, 2, vec![Layer::alpha(0, vec![0; 2048])]);

    let err = parse(&adt, AlphaMode::Narrow4Bit).unwrap_err();
    assert!(matches!(
        err,
        FormatError::LayerPolicyViolation {
            chunk_x: 4,
            chunk_y: 2,
            layer: 0,
            ..
        }
    ));
}

#[test]
fn upper_layer_without_alpha_is_rejected() {
    let adt = AdtBuilder::new(["a.blp", "b.blp"])
        .layers(0, 0, vec![Layer::base(0), Layer::base(1)]);

    let err = parse(&adt, AlphaMode::Narrow4Bit).unwrap_err();
    assert!(matches!(
        err,
        FormatError::LayerPolicyViolation { layer: 1, .. }
    ));
}

#[test]
fn compressed_narrow_alpha_is_rejected() {
    let adt = AdtBuilder::new(["a.blp", "b.blp"])
        .layers(0, 0, vec![Layer::base(0), Layer::compressed(1, rle_fill(4096, 1))]);

    let err = parse(&adt, AlphaMode::Narrow4Bit).unwrap_err();
    assert!(matches!(
        err,
        FormatError::LayerPolicyViolation { layer: 1, .. }
    ));
}

#[test]
fn alpha_region_too_small_for_mode() {
    // 2048 bytes stored, but 8-bit mode needs 4096
    let adt = AdtBuilder::new(["a.blp", "b.blp"])
        .layers(0, 0, vec![Layer::base(0), Layer::alpha(1, vec![0; 2048])]);

    let err = parse(&adt, AlphaMode::Wide8Bit).unwrap_err();
    assert!(matches!(
        err,
        FormatError::TruncatedInput {
            context: "MCAL layer",
            needed: 4096,
            available: 2056,
        }
    ));
}

#[test]
fn unsupported_version() {
    let adt = AdtBuilder::new(["a.blp"]).version(17);
    let err = parse(&adt, AlphaMode::Narrow4Bit).unwrap_err();
    assert!(matches!(err, FormatError::UnsupportedVersion(17)));
}

#[test]
fn empty_texture_list_is_a_skip() {
    let adt = AdtBuilder::new(Vec::<String>::new());
    let err = parse(&adt, AlphaMode::Narrow4Bit).unwrap_err();
    assert!(matches!(err, FormatError::NoTextures));
    assert!(err.is_skip());
}

#[test]
fn texture_id_outside_mtex() {
    let adt = AdtBuilder::new(["a.blp", "b.blp"])
        .layers(0, 0, vec![Layer::base(0), Layer::alpha(5, vec![0; 4096])]);

    let err = parse(&adt, AlphaMode::Wide8Bit).unwrap_err();
    assert!(matches!(
        err,
        FormatError::InvalidTextureReference { index: 5, count: 2 }
    ));
}

#[test]
fn mcnk_size_must_match_index() {
    let adt = AdtBuilder::new(["a.blp"]).mcin_size_adjust(4);
    let err = parse(&adt, AlphaMode::Narrow4Bit).unwrap_err();
    assert!(matches!(err, FormatError::SizeMismatch { .. }));
}

#[test]
fn parse_file_reads_from_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = AdtBuilder::new(["a.blp"])
        .layers(15, 15, vec![Layer::base(0)])
        .write(dir.path(), "Test_0_0.adt");

    let maps = TileParser::new(AlphaMode::Narrow4Bit)
        .parse_file(&path)
        .unwrap();
    assert_eq!(maps.canvases[0].get(1023, 1023), 255);
    assert_eq!(maps.canvases[0].get(959, 1023), 0);
}
