use anyhow::{Context, Result, bail};
use image::ImageReader;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{ConversionConfig, NamingScheme};
use crate::encode::{check_dimensions, encode_webp};
use crate::exif;
use crate::orient::{self, Rotation};
use crate::resize;

/// Extension given to every output file.
pub const OUTPUT_EXTENSION: &str = "webp";

/// Source formats the converter accepts.
///
/// Scanning goes by extension; a decoded [`ImageFile`] records the sniffed
/// content format instead when it is one of these.
///
/// # Example
///
/// ```rust
/// use webp_convert::pipeline::ImageKind;
/// use std::path::Path;
///
/// assert_eq!(ImageKind::from_path(Path::new("IMG_0001.JPG")), Some(ImageKind::Jpeg));
/// assert_eq!(ImageKind::from_path(Path::new("notes.txt")), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    /// `.jpg` / `.jpeg`
    Jpeg,
    /// `.png`
    Png,
}

impl ImageKind {
    /// Determine the image kind from a file path extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Map a sniffed [`image::ImageFormat`] to a kind, if it is one we accept.
    pub fn from_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Png => Some(Self::Png),
            _ => None,
        }
    }
}

/// A decoded source image, as found on disk before any transform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageFile {
    pub path: PathBuf,
    pub kind: ImageKind,
    pub width: u32,
    pub height: u32,
    /// Raw EXIF orientation tag, if one could be read.
    pub orientation: Option<u16>,
}

/// The outcome of converting one image.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResult {
    pub source: ImageFile,
    /// Where the WebP was (or, on a dry run, would have been) written.
    pub output: PathBuf,
    pub rotation: Rotation,
    pub width: u32,
    pub height: u32,
    /// Size of the encoded WebP.
    pub bytes: usize,
    /// `false` on a dry run.
    pub written: bool,
}

/// Collect the convertible images directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into, and files with any other extension
/// are skipped. A missing or unreadable directory is an error.
///
/// # Example
///
/// ```rust,no_run
/// use webp_convert::pipeline::collect_images;
/// use std::path::Path;
///
/// let images = collect_images(Path::new("./photos")).unwrap();
/// println!("Found {} images", images.len());
/// ```
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Input directory does not exist: {}", dir.display());
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if ImageKind::from_path(path).is_some() {
            images.push(path.to_path_buf());
        } else {
            log::debug!("Skipping non-image file: {}", path.display());
        }
    }

    Ok(images)
}

/// Build the output file name for an image with the given stem and final size.
///
/// ```rust
/// use webp_convert::config::ConversionConfig;
/// use webp_convert::pipeline::output_file_name;
///
/// let config = ConversionConfig::new(80, 640).unwrap();
/// assert_eq!(output_file_name("beach", &config, 640, 480), "beach_q80_640x480.webp");
/// ```
pub fn output_file_name(stem: &str, config: &ConversionConfig, width: u32, height: u32) -> String {
    match config.naming {
        NamingScheme::Tagged => format!(
            "{stem}_q{}_{width}x{height}.{OUTPUT_EXTENSION}",
            config.quality
        ),
        NamingScheme::Plain => format!("{stem}.{OUTPUT_EXTENSION}"),
    }
}

/// Convert a single image to WebP inside `output_dir`.
///
/// The flow is:
///
/// 1. **Orient** — Read the EXIF orientation tag and rotate to upright. A
///    missing or unreadable EXIF block is logged and ignored.
/// 2. **Resize** — Scale to `config.target_width` keeping the aspect ratio
///    (skipped when it is 0).
/// 3. **Encode** — Lossy WebP at `config.quality`, written as
///    [`output_file_name`] unless `config.dry_run` is set.
///
/// Any other failure (unreadable file, decode or encode error, write error)
/// is returned.
pub fn convert_image(path: &Path, output_dir: &Path, config: &ConversionConfig) -> Result<ConvertResult> {
    let ext_kind = ImageKind::from_path(path)
        .with_context(|| format!("Unsupported image type: {}", path.display()))?;

    let orientation = match exif::read_orientation(path) {
        Ok(tag) => tag,
        Err(e) => {
            log::warn!("Failed to read EXIF from {}: {e:#}", path.display());
            None
        }
    };

    // Content sniffing wins; `open` already falls back to the extension.
    let reader = ImageReader::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let kind = reader
        .format()
        .and_then(ImageKind::from_format)
        .unwrap_or(ext_kind);
    let img = reader
        .decode()
        .with_context(|| format!("Failed to decode {}", path.display()))?;

    let source = ImageFile {
        path: path.to_path_buf(),
        kind,
        width: img.width(),
        height: img.height(),
        orientation,
    };

    let rotation = Rotation::from_exif(orientation);
    if rotation != Rotation::None {
        log::debug!("  Rotating {}° to undo EXIF orientation", rotation.degrees());
    }

    // Reject oversized output before the resize allocates it.
    let (upright_width, upright_height) = if rotation.swaps_axes() {
        (source.height, source.width)
    } else {
        (source.width, source.height)
    };
    let (out_width, out_height) =
        resize::target_dimensions(upright_width, upright_height, config.target_width);
    check_dimensions(out_width, out_height)
        .with_context(|| format!("Cannot convert {}", path.display()))?;

    let img = orient::apply(img, rotation);
    let img = resize::apply(img, config.target_width, config.filter);
    let (width, height) = (img.width(), img.height());

    let bytes = encode_webp(&img, config.quality)
        .with_context(|| format!("Failed to encode {}", path.display()))?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output = output_dir.join(output_file_name(&stem, config, width, height));

    if !config.dry_run {
        std::fs::write(&output, &bytes)
            .with_context(|| format!("Failed to write {}", output.display()))?;
    }

    Ok(ConvertResult {
        source,
        output,
        rotation,
        width,
        height,
        bytes: bytes.len(),
        written: !config.dry_run,
    })
}

/// Convert every JPEG/PNG directly inside `input_dir` into `output_dir`.
///
/// The output directory is created if missing (even on a dry run, so that
/// a bad output path is reported up front). Files are processed in name
/// order and the first failure aborts the batch.
///
/// # Example
///
/// ```rust,no_run
/// use webp_convert::config::ConversionConfig;
/// use webp_convert::pipeline::convert_dir;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = ConversionConfig::new(80, 1200)?;
/// let results = convert_dir(Path::new("./photos"), Path::new("./webp"), &config)?;
/// for r in &results {
///     println!("{} -> {}", r.source.path.display(), r.output.display());
/// }
/// # Ok(())
/// # }
/// ```
pub fn convert_dir(input_dir: &Path, output_dir: &Path, config: &ConversionConfig) -> Result<Vec<ConvertResult>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let images = collect_images(input_dir)?;
    log::info!("Found {} image(s) to convert", images.len());

    let total = images.len();
    let mut results = Vec::with_capacity(total);
    for (i, path) in images.iter().enumerate() {
        log::info!("[{}/{}] Converting: {}", i + 1, total, path.display());
        let result = convert_image(path, output_dir, config)?;
        log::info!(
            "  {} {}x{} ({} bytes)",
            if result.written { "Wrote" } else { "Would write" },
            result.width,
            result.height,
            result.bytes
        );
        results.push(result);
    }

    Ok(results)
}
