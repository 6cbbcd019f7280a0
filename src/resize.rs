use image::DynamicImage;

use crate::config::ResizeFilter;

/// Output dimensions for a `width`×`height` image scaled to `target_width`.
///
/// Height is `round(target_width / (width / height))`, rounding ties to even,
/// and never drops below one pixel. A `target_width` of 0 (or a degenerate
/// source) returns the source dimensions unchanged.
///
/// ```rust
/// use webp_convert::resize::target_dimensions;
///
/// assert_eq!(target_dimensions(4000, 3000, 800), (800, 600));
/// assert_eq!(target_dimensions(4000, 3000, 0), (4000, 3000));
/// ```
pub fn target_dimensions(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    if target_width == 0 || width == 0 || height == 0 {
        return (width, height);
    }

    let aspect = f64::from(width) / f64::from(height);
    let target_height = (f64::from(target_width) / aspect).round_ties_even();
    // Saturating float-to-int cast; clamp to a 1px floor.
    let target_height = (target_height as u32).max(1);

    (target_width, target_height)
}

/// Resize `img` to `target_width`, keeping its aspect ratio.
///
/// Exact resize, no crop or letterbox. Returns the image untouched when
/// `target_width` is 0 or already matches.
pub fn apply(img: DynamicImage, target_width: u32, filter: ResizeFilter) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    let (new_width, new_height) = target_dimensions(width, height, target_width);

    if (new_width, new_height) == (width, height) {
        return img;
    }

    log::debug!("Resizing {width}x{height} -> {new_width}x{new_height} ({filter})");
    img.resize_exact(new_width, new_height, filter.filter_type())
}
