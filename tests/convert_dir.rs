use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage, RgbaImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use webp_convert::config::{ConversionConfig, NamingScheme};
use webp_convert::orient::Rotation;
use webp_convert::pipeline::{ImageKind, convert_dir};

/// Build a big-endian TIFF block carrying only IFD0/Orientation.
fn orientation_tiff(orientation: u16) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2A");
    tiff.extend_from_slice(&8u32.to_be_bytes()); // IFD0 offset
    tiff.extend_from_slice(&1u16.to_be_bytes()); // one entry
    tiff.extend_from_slice(&0x0112u16.to_be_bytes()); // Orientation
    tiff.extend_from_slice(&3u16.to_be_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_be_bytes()); // count
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]); // value padding
    tiff.extend_from_slice(&0u32.to_be_bytes()); // no IFD1
    tiff
}

/// Wrap a TIFF block in a JPEG APP1 "Exif" segment.
fn exif_app1(tiff: &[u8]) -> Vec<u8> {
    let mut payload = b"Exif\x00\x00".to_vec();
    payload.extend_from_slice(tiff);

    let mut segment = vec![0xFF, 0xE1];
    segment.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    segment.extend_from_slice(&payload);
    segment
}

/// Write a `width`×`height` JPEG, with an EXIF orientation tag if given.
fn write_jpeg(path: &Path, width: u32, height: u32, orientation: Option<u16>) {
    let app1 = orientation.map(|tag| exif_app1(&orientation_tiff(tag)));
    write_jpeg_with_app1(path, width, height, app1);
}

/// Write a `width`×`height` JPEG with `app1` spliced in right after SOI.
fn write_jpeg_with_app1(path: &Path, width: u32, height: u32, app1: Option<Vec<u8>>) {
    let img = RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 { Rgb([200, 30, 30]) } else { Rgb([30, 30, 200]) }
    });

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, 95)
        .encode_image(&img)
        .unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    if let Some(segment) = app1 {
        let rest = jpeg.split_off(2);
        jpeg.extend(segment);
        jpeg.extend(rest);
    }
    fs::write(path, jpeg).unwrap();
}

fn write_png(path: &Path, width: u32, height: u32) {
    DynamicImage::ImageRgba8(RgbaImage::new(width, height))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

fn webp_dimensions(path: &Path) -> (u32, u32) {
    let bytes = fs::read(path).unwrap();
    image::load_from_memory_with_format(&bytes, ImageFormat::WebP)
        .unwrap()
        .dimensions()
}

#[test]
fn every_supported_file_gets_an_output() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    write_jpeg(&input.path().join("a.jpg"), 16, 8, None);
    write_jpeg(&input.path().join("b.JPEG"), 16, 8, None);
    write_png(&input.path().join("c.png"), 10, 10);
    fs::write(input.path().join("d.gif"), b"GIF89a").unwrap();
    fs::write(input.path().join("notes.txt"), b"skip me").unwrap();

    let results = convert_dir(input.path(), output.path(), &ConversionConfig::default()).unwrap();

    assert_eq!(results.len(), 3);
    for name in ["a_q80_16x8.webp", "b_q80_16x8.webp", "c_q80_10x10.webp"] {
        assert!(output.path().join(name).is_file(), "missing {name}");
    }
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 3);
    assert_eq!(results[2].source.kind, ImageKind::Png);
}

#[test]
fn resize_keeps_aspect_ratio() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_png(&input.path().join("wide.png"), 300, 200);

    let config = ConversionConfig::new(60, 100).unwrap();
    let results = convert_dir(input.path(), output.path(), &config).unwrap();

    // 100 / (300 / 200) = 66.67 -> 67
    let out = output.path().join("wide_q60_100x67.webp");
    assert_eq!(results[0].output, out);
    assert_eq!(webp_dimensions(&out), (100, 67));
}

#[test]
fn exif_orientation_6_is_uprighted() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_jpeg(&input.path().join("portrait.jpg"), 40, 20, Some(6));

    let results = convert_dir(input.path(), output.path(), &ConversionConfig::default()).unwrap();
    let result = &results[0];

    assert_eq!(result.source.orientation, Some(6));
    assert_eq!((result.source.width, result.source.height), (40, 20));
    assert_eq!(result.rotation, Rotation::Ccw270);
    assert_eq!(webp_dimensions(&output.path().join("portrait_q80_20x40.webp")), (20, 40));
}

#[test]
fn rotation_happens_before_resize() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_jpeg(&input.path().join("phone.jpg"), 40, 20, Some(8));

    let config = ConversionConfig::new(70, 10).unwrap();
    let results = convert_dir(input.path(), output.path(), &config).unwrap();

    assert_eq!(results[0].rotation, Rotation::Ccw90);
    assert_eq!(webp_dimensions(&output.path().join("phone_q70_10x20.webp")), (10, 20));
}

#[test]
fn exif_orientation_3_keeps_dimensions() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_jpeg(&input.path().join("upside.jpg"), 40, 20, Some(3));

    let results = convert_dir(input.path(), output.path(), &ConversionConfig::default()).unwrap();

    assert_eq!(results[0].rotation, Rotation::Ccw180);
    assert!(output.path().join("upside_q80_40x20.webp").is_file());
}

#[test]
fn mirrored_orientation_is_ignored() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_jpeg(&input.path().join("mirror.jpg"), 40, 20, Some(5));

    let results = convert_dir(input.path(), output.path(), &ConversionConfig::default()).unwrap();

    assert_eq!(results[0].source.orientation, Some(5));
    assert_eq!(results[0].rotation, Rotation::None);
    assert!(output.path().join("mirror_q80_40x20.webp").is_file());
}

#[test]
fn malformed_exif_keeps_original_orientation() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    // IFD0 offset points far past the end of the block.
    let mut bad_offset = orientation_tiff(6);
    bad_offset[4..8].copy_from_slice(&0xFFFF_FF00u32.to_be_bytes());
    write_jpeg_with_app1(&input.path().join("bad_offset.jpg"), 8, 4, Some(exif_app1(&bad_offset)));

    // Byte order mark and magic only, no IFD offset.
    write_jpeg_with_app1(&input.path().join("truncated.jpg"), 8, 4, Some(exif_app1(b"MM\x00\x2A")));

    let results = convert_dir(input.path(), output.path(), &ConversionConfig::default()).unwrap();

    assert_eq!(results.len(), 2);
    for result in &results {
        assert_eq!(result.source.orientation, None);
        assert_eq!(result.rotation, Rotation::None);
        assert_eq!((result.width, result.height), (8, 4));
    }
    assert_eq!(webp_dimensions(&output.path().join("bad_offset_q80_8x4.webp")), (8, 4));
    assert_eq!(webp_dimensions(&output.path().join("truncated_q80_8x4.webp")), (8, 4));
}

#[test]
fn plain_names_and_dry_run() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_png(&input.path().join("icon.png"), 12, 12);

    let plain = ConversionConfig {
        naming: NamingScheme::Plain,
        ..ConversionConfig::default()
    };
    convert_dir(input.path(), output.path(), &plain).unwrap();
    assert!(output.path().join("icon.webp").is_file());

    let dry_out = output.path().join("dry");
    let dry = ConversionConfig {
        dry_run: true,
        ..ConversionConfig::default()
    };
    let results = convert_dir(input.path(), &dry_out, &dry).unwrap();
    assert_eq!(results[0].output, dry_out.join("icon_q80_12x12.webp"));
    assert!(!results[0].written);
    assert_eq!(fs::read_dir(&dry_out).unwrap().count(), 0);
}

#[test]
fn results_serialize_to_json() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_png(&input.path().join("j.png"), 4, 2);

    let results = convert_dir(input.path(), output.path(), &ConversionConfig::default()).unwrap();
    let json = serde_json::to_value(&results).unwrap();

    assert_eq!(json[0]["width"], 4);
    assert_eq!(json[0]["height"], 2);
    assert_eq!(json[0]["rotation"], "none");
    assert_eq!(json[0]["source"]["kind"], "png");
}
