use anyhow::{Result, anyhow, bail};
use image::DynamicImage;
use std::borrow::Cow;

/// Largest width or height libwebp can encode.
pub const WEBP_MAX_DIMENSION: u32 = 16383;

/// Encode `img` as lossy WebP at `quality` (0–100).
///
/// libwebp only takes 8-bit RGB or RGBA, so other pixel layouts (grey,
/// 16-bit PNGs, …) are converted first. Alpha is kept when the source has it.
pub fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    check_dimensions(img.width(), img.height())?;

    let pixels = to_webp_layout(img);
    let encoder = webp::Encoder::from_image(&pixels)
        .map_err(|e| anyhow!("WebP encoder rejected image: {e}"))?;
    let memory = encoder
        .encode_simple(false, f32::from(quality))
        .map_err(|e| anyhow!("WebP encoding failed: {e:?}"))?;

    Ok(memory.to_vec())
}

/// Fail unless a `width`×`height` image fits in a WebP file.
///
/// Cheap enough to call before allocating a resize target.
pub fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        bail!("Cannot encode an empty {width}x{height} image");
    }
    if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
        bail!(
            "{width}x{height} exceeds the WebP limit of {WEBP_MAX_DIMENSION}px per side; use --width to shrink it"
        );
    }
    Ok(())
}

fn to_webp_layout(img: &DynamicImage) -> Cow<'_, DynamicImage> {
    match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => Cow::Borrowed(img),
        _ if img.color().has_alpha() => Cow::Owned(DynamicImage::ImageRgba8(img.to_rgba8())),
        _ => Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8())),
    }
}
