use anyhow::{Context, Result};
use nom_exif::*;
use std::path::Path;

/// Read the EXIF orientation tag (0x0112) from an image file.
///
/// Returns `Ok(None)` when the file parses but carries no orientation tag.
/// Containers nom-exif can't parse (including most PNGs) and corrupt EXIF
/// blocks surface as errors; callers treat those as "leave the image alone".
pub fn read_orientation(path: &Path) -> Result<Option<u16>> {
    let mut parser = MediaParser::new();
    let ms = MediaSource::file_path(path).context("Failed to open image file")?;

    let iter: ExifIter = parser
        .parse(ms)
        .with_context(|| format!("No readable EXIF data in {}", path.display()))?;
    let exif: Exif = iter.into();

    let orientation = exif.get(ExifTag::Orientation).and_then(entry_to_u16);
    if let Some(tag) = orientation {
        log::debug!("EXIF orientation {tag} in {}", path.display());
    }

    Ok(orientation)
}

/// Orientation is a SHORT, but tolerate writers that store it wider.
fn entry_to_u16(val: &EntryValue) -> Option<u16> {
    match val {
        EntryValue::U8(v) => Some(u16::from(*v)),
        EntryValue::U16(v) => Some(*v),
        EntryValue::U32(v) => u16::try_from(*v).ok(),
        _ => None,
    }
}
