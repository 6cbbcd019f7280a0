//! EXIF metadata reading.
//!
//! Only the orientation tag matters for conversion, so this module exposes a
//! single function:
//!
//! - [`read_orientation`] — Read the EXIF orientation tag from a JPEG (or any
//!   container nom-exif understands)
//!
//! Failures here are never fatal to a conversion; see
//! [`convert_image`](crate::pipeline::convert_image).

mod reader;

pub use reader::read_orientation;
