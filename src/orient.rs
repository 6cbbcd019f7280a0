use image::DynamicImage;
use serde::Serialize;

/// Rotation applied to undo the camera's capture orientation.
///
/// Degrees are counter-clockwise. Rotations never crop: width and height swap
/// for the quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rotation {
    None,
    Ccw90,
    Ccw180,
    Ccw270,
}

impl Rotation {
    /// Map an EXIF orientation tag to the rotation that uprights the image.
    ///
    /// Only the pure-rotation tags are honoured: 3 → 180°, 6 → 270°, 8 → 90°.
    /// Mirrored orientations (2, 4, 5, 7), the identity (1) and out-of-range
    /// values leave the image alone.
    pub fn from_exif(tag: Option<u16>) -> Self {
        match tag {
            Some(3) => Self::Ccw180,
            Some(6) => Self::Ccw270,
            Some(8) => Self::Ccw90,
            _ => Self::None,
        }
    }

    pub fn degrees(&self) -> u16 {
        match self {
            Self::None => 0,
            Self::Ccw90 => 90,
            Self::Ccw180 => 180,
            Self::Ccw270 => 270,
        }
    }

    /// `true` if this rotation swaps width and height.
    pub fn swaps_axes(&self) -> bool {
        matches!(self, Self::Ccw90 | Self::Ccw270)
    }
}

/// Rotate `img` by `rotation`. `image` rotates clockwise, so the quarter turns
/// are mirrored here.
pub fn apply(img: DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::None => img,
        Rotation::Ccw90 => img.rotate270(),
        Rotation::Ccw180 => img.rotate180(),
        Rotation::Ccw270 => img.rotate90(),
    }
}
