use anyhow::{Result, bail};
use image::imageops::FilterType;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::encode::WEBP_MAX_DIMENSION;

/// Highest accepted WebP quality.
pub const MAX_QUALITY: u8 = 100;

/// Quality used when none is given.
pub const DEFAULT_QUALITY: u8 = 80;

/// Settings for one conversion run.
///
/// Built once from command-line input and never mutated afterwards.
///
/// # Example
///
/// ```rust
/// use webp_convert::config::{ConversionConfig, NamingScheme};
///
/// let config = ConversionConfig::new(75, 1200).unwrap();
/// assert_eq!(config.quality, 75);
/// assert_eq!(config.naming, NamingScheme::Tagged);
///
/// // Quality is a 0–100 scale
/// assert!(ConversionConfig::new(101, 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionConfig {
    /// Lossy WebP quality, 0–100. Semantics are libwebp's.
    pub quality: u8,
    /// Output width in pixels. `0` keeps the source size.
    pub target_width: u32,
    /// How output files are named.
    pub naming: NamingScheme,
    /// Resampling filter used when `target_width` is non-zero.
    pub filter: ResizeFilter,
    /// If `true`, encode in memory but never write to the output directory.
    pub dry_run: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            target_width: 0,
            naming: NamingScheme::Tagged,
            filter: ResizeFilter::CatmullRom,
            dry_run: false,
        }
    }
}

impl ConversionConfig {
    /// Create a config with the given quality and target width, defaults elsewhere.
    ///
    /// Widths above the WebP limit are rejected.
    pub fn new(quality: u8, target_width: u32) -> Result<Self> {
        if quality > MAX_QUALITY {
            bail!("Quality must be between 0 and {MAX_QUALITY}, got {quality}");
        }
        if target_width > WEBP_MAX_DIMENSION {
            bail!("Width must be at most {WEBP_MAX_DIMENSION}, got {target_width}");
        }
        Ok(Self {
            quality,
            target_width,
            ..Self::default()
        })
    }

    /// `true` if images will be resized.
    pub fn resizes(&self) -> bool {
        self.target_width > 0
    }
}

/// Output filename layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingScheme {
    /// `{basename}_q{quality}_{width}x{height}.webp`
    Tagged,
    /// `{basename}.webp`
    Plain,
}

/// Resampling filter for resizes. Thin wrapper over [`FilterType`] so it can
/// be parsed from a string and serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResizeFilter {
    pub const ALL: [ResizeFilter; 5] = [
        Self::Nearest,
        Self::Triangle,
        Self::CatmullRom,
        Self::Gaussian,
        Self::Lanczos3,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Triangle => "triangle",
            Self::CatmullRom => "catmull-rom",
            Self::Gaussian => "gaussian",
            Self::Lanczos3 => "lanczos3",
        }
    }

    pub fn filter_type(&self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResizeFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        match wanted.as_str() {
            "bicubic" | "cubic" => return Ok(Self::CatmullRom),
            "bilinear" | "linear" => return Ok(Self::Triangle),
            "lanczos" => return Ok(Self::Lanczos3),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|f| f.name()).collect();
                anyhow::anyhow!("Unknown filter '{s}', expected one of: {}", names.join(", "))
            })
    }
}
