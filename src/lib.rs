//! # webp-convert
//!
//! Batch-convert JPEG and PNG images to WebP, fixing EXIF rotation and
//! optionally resizing to a target width with the aspect ratio preserved.
//!
//! ## Quick Start
//!
//! The pipeline module handles the full scan → orient → resize → encode flow
//! for a whole directory:
//!
//! ```rust,no_run
//! use webp_convert::config::ConversionConfig;
//! use webp_convert::pipeline::convert_dir;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Quality 80, resize to 1200px wide
//!     let config = ConversionConfig::new(80, 1200)?;
//!
//!     let results = convert_dir(Path::new("./photos"), Path::new("./webp"), &config)?;
//!     for r in &results {
//!         println!("{} -> {}", r.source.path.display(), r.output.display());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! Each step is usable on its own:
//!
//! ```rust,no_run
//! use webp_convert::{encode, exif, orient, resize};
//! use webp_convert::config::ResizeFilter;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let path = Path::new("photo.jpg");
//!
//!     let tag = exif::read_orientation(path).unwrap_or(None);
//!     let img = image::open(path)?;
//!     let img = orient::apply(img, orient::Rotation::from_exif(tag));
//!     let img = resize::apply(img, 800, ResizeFilter::CatmullRom);
//!
//!     std::fs::write("photo.webp", encode::encode_webp(&img, 75)?)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Output Names
//!
//! | Scheme | File name |
//! |--------|-----------|
//! | [`Tagged`](config::NamingScheme::Tagged) (default) | `{name}_q{quality}_{width}x{height}.webp` |
//! | [`Plain`](config::NamingScheme::Plain) | `{name}.webp` |
//!
//! ## Modules
//!
//! - [`config`] — Conversion settings, naming scheme and resize filter
//! - [`exif`] — EXIF orientation reading
//! - [`orient`] — Orientation tag → rotation mapping
//! - [`resize`] — Aspect-preserving resize
//! - [`encode`] — Lossy WebP encoding
//! - [`pipeline`] — Directory scanning, output naming and the per-file conversion flow

pub mod config;
pub mod encode;
pub mod exif;
pub mod orient;
pub mod pipeline;
pub mod resize;
