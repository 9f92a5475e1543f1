//! EXIF orientation: reading the tag and removing it from a raw TIFF block
//!
//! The EXIF payload handled here is the TIFF structure that follows the
//! `Exif\0\0` prefix of a JPEG APP1 segment.

use exif::{In, Reader, Tag};

use crate::error::ProcessError;
use crate::orientation::ORIENTATION_TAG;

const TIFF_MAGIC: u16 = 42;
const IFD_ENTRY_LEN: usize = 12;

/// Read the orientation code from the primary IFD.
///
/// `Ok(None)` means the block parsed but carries no orientation field.
pub fn read_orientation(exif: &[u8]) -> Result<Option<u16>, ProcessError> {
    let parsed = Reader::new().read_raw(exif.to_vec())?;

    let Some(field) = parsed.get_field(Tag::Orientation, In::PRIMARY) else {
        return Ok(None);
    };

    let code = field
        .value
        .get_uint(0)
        .and_then(|v| u16::try_from(v).ok())
        .ok_or_else(|| {
            ProcessError::Metadata(format!(
                "orientation field has unexpected value {}",
                field.display_value()
            ))
        })?;

    Ok(Some(code))
}

#[derive(Clone, Copy)]
enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    fn u16(self, bytes: &[u8], at: usize) -> Option<u16> {
        let raw: [u8; 2] = bytes.get(at..at + 2)?.try_into().ok()?;
        Some(match self {
            ByteOrder::Little => u16::from_le_bytes(raw),
            ByteOrder::Big => u16::from_be_bytes(raw),
        })
    }

    fn u32(self, bytes: &[u8], at: usize) -> Option<u32> {
        let raw: [u8; 4] = bytes.get(at..at + 4)?.try_into().ok()?;
        Some(match self {
            ByteOrder::Little => u32::from_le_bytes(raw),
            ByteOrder::Big => u32::from_be_bytes(raw),
        })
    }

    fn put_u16(self, bytes: &mut [u8], at: usize, value: u16) {
        let raw = match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        };
        bytes[at..at + 2].copy_from_slice(&raw);
    }
}

fn truncated() -> ProcessError {
    ProcessError::Metadata("truncated TIFF structure".to_string())
}

/// Remove the orientation entry from IFD0.
///
/// Later entries and the next-IFD pointer shift up by one entry and the freed
/// tail is zeroed. The block keeps its length, so every offset elsewhere in
/// the structure stays valid and all other fields survive untouched.
/// Returns `Ok(None)` when IFD0 has no orientation entry.
pub fn strip_orientation(exif: &[u8]) -> Result<Option<Vec<u8>>, ProcessError> {
    let order = match exif.get(0..2) {
        Some(b"II") => ByteOrder::Little,
        Some(b"MM") => ByteOrder::Big,
        _ => {
            return Err(ProcessError::Metadata(
                "missing TIFF byte-order mark".to_string(),
            ))
        }
    };

    if order.u16(exif, 2) != Some(TIFF_MAGIC) {
        return Err(ProcessError::Metadata("bad TIFF magic number".to_string()));
    }

    let ifd0 = order.u32(exif, 4).ok_or_else(truncated)? as usize;
    let count = order.u16(exif, ifd0).ok_or_else(truncated)? as usize;
    let entries_start = ifd0 + 2;
    let entries_end = entries_start + count * IFD_ENTRY_LEN;
    // the next-IFD pointer follows the entries
    let ifd_end = entries_end + 4;
    if ifd_end > exif.len() {
        return Err(truncated());
    }

    let position = (0..count)
        .map(|i| entries_start + i * IFD_ENTRY_LEN)
        .find(|&offset| order.u16(exif, offset) == Some(ORIENTATION_TAG));

    let Some(offset) = position else {
        return Ok(None);
    };

    let mut out = exif.to_vec();
    out.copy_within(offset + IFD_ENTRY_LEN..ifd_end, offset);
    out[ifd_end - IFD_ENTRY_LEN..ifd_end].fill(0);
    // count >= 1 because an entry was found
    order.put_u16(&mut out, ifd0, (count - 1) as u16);

    Ok(Some(out))
}
