//! Fixtures for batch tests: small greyscale JPEGs with hand-built EXIF blocks.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use bytes::Bytes;
use exif::{In, Reader, Tag};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, GrayImage, Luma};
use img_parts::jpeg::{Jpeg, JpegSegment};
use img_parts::ImageEXIF;

pub const DARK: u8 = 20;
pub const BRIGHT: u8 = 235;
pub const COMMENT: &[u8] = b"upright test";

const COM: u8 = 0xFE;
const SOF0: u8 = 0xC0;
const APP1: u8 = 0xE1;

/// 32x16 image, dark on the left half and bright on the right half
pub fn split_image() -> GrayImage {
    GrayImage::from_fn(32, 16, |x, _| Luma([if x < 16 { DARK } else { BRIGHT }]))
}

/// Little-endian TIFF block with a Make field and an optional orientation
pub fn exif_block(orientation: Option<u16>) -> Vec<u8> {
    let mut entries: Vec<(u16, u16, u32, [u8; 4])> = vec![(0x010F, 2, 4, *b"Cam\0")];
    if let Some(code) = orientation {
        let v = code.to_le_bytes();
        entries.push((0x0112, 3, 1, [v[0], v[1], 0, 0]));
    }
    tiff_block(&entries)
}

/// Orientation followed by an Exif IFD pointer past the end of the block,
/// which the EXIF reader rejects
pub fn exif_block_with_dangling_pointer(orientation: u16) -> Vec<u8> {
    let v = orientation.to_le_bytes();
    tiff_block(&[
        (0x0112, 3, 1, [v[0], v[1], 0, 0]),
        (0x8769, 4, 1, 5000u32.to_le_bytes()),
    ])
}

/// Little-endian TIFF header plus a single IFD holding `entries`
fn tiff_block(entries: &[(u16, u16, u32, [u8; 4])]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for (tag, kind, count, value) in entries {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&kind.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(value);
    }
    out.extend_from_slice(&0u32.to_le_bytes());
    out
}

/// Encode `img` and attach a comment segment plus the given raw EXIF block
pub fn jpeg_bytes(img: &GrayImage, exif: Option<Vec<u8>>) -> Vec<u8> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, 100)
        .encode(img.as_raw(), img.width(), img.height(), ExtendedColorType::L8)
        .unwrap();

    let mut jpeg = Jpeg::from_bytes(Bytes::from(buffer)).unwrap();
    jpeg.segments_mut()
        .insert(1, JpegSegment::new_with_contents(COM, Bytes::from_static(COMMENT)));
    if let Some(exif) = exif {
        jpeg.set_exif(Some(Bytes::from(exif)));
    }
    jpeg.encoder().bytes().to_vec()
}

/// 64x32 image, dark in the top-left quadrant and bright elsewhere
pub fn quadrant_image() -> GrayImage {
    GrayImage::from_fn(64, 32, |x, y| {
        Luma([if x < 32 && y < 16 { DARK } else { BRIGHT }])
    })
}

/// Write `img` as a JPEG named `name` with the given raw EXIF block
pub fn write_image(dir: &Path, name: &str, img: &GrayImage, exif: Option<Vec<u8>>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, jpeg_bytes(img, exif)).unwrap();
    path
}

/// Set the frame height to zero so the pixel data can no longer be decoded
pub fn with_zero_height(jpeg: Vec<u8>) -> Vec<u8> {
    let mut container = Jpeg::from_bytes(Bytes::from(jpeg)).unwrap();
    let segments = container.segments_mut();
    let index = segments.iter().position(|s| s.marker() == SOF0).unwrap();
    let mut contents = segments[index].contents().to_vec();
    // precision byte, then the big-endian height
    contents[1] = 0;
    contents[2] = 0;
    segments[index] = JpegSegment::new_with_contents(SOF0, Bytes::from(contents));
    container.encoder().bytes().to_vec()
}

/// Write a split-image JPEG named `name` carrying `orientation`
pub fn write_jpeg(dir: &Path, name: &str, orientation: Option<u16>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, jpeg_bytes(&split_image(), Some(exif_block(orientation)))).unwrap();
    path
}

fn container(path: &Path) -> Jpeg {
    let data = std::fs::read(path).unwrap();
    Jpeg::from_bytes(Bytes::from(data)).unwrap()
}

/// Orientation tag of the file at `path`, if present
pub fn orientation_of(path: &Path) -> Option<u16> {
    let exif = container(path).exif()?;
    let parsed = Reader::new().read_raw(exif.to_vec()).unwrap();
    parsed
        .get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .map(|v| v as u16)
}

/// Raw EXIF block of the file at `path`
pub fn exif_of(path: &Path) -> Option<Vec<u8>> {
    container(path).exif().map(|b| b.to_vec())
}

/// Every segment except APP1, scan data included
pub fn non_exif_segments(path: &Path) -> Vec<(u8, Bytes)> {
    container(path)
        .segments()
        .iter()
        .filter(|s| s.marker() != APP1)
        .map(|s| (s.marker(), s.contents().clone()))
        .collect()
}

/// Make field of the file at `path`, if present
pub fn make_of(path: &Path) -> Option<Vec<u8>> {
    let exif = container(path).exif()?;
    let parsed = Reader::new().read_raw(exif.to_vec()).unwrap();
    match &parsed.get_field(Tag::Make, In::PRIMARY)?.value {
        exif::Value::Ascii(values) => values.first().cloned(),
        _ => None,
    }
}

/// Whether the comment segment written by the fixtures is still present
pub fn has_comment(path: &Path) -> bool {
    container(path)
        .segments()
        .iter()
        .any(|s| s.marker() == COM && s.contents().as_ref() == COMMENT)
}

pub fn decode(path: &Path) -> GrayImage {
    image::open(path).unwrap().to_luma8()
}

pub fn is_dark(img: &GrayImage, x: u32, y: u32) -> bool {
    img.get_pixel(x, y)[0] < 64
}

pub fn is_bright(img: &GrayImage, x: u32, y: u32) -> bool {
    img.get_pixel(x, y)[0] > 192
}

/// Which quadrant of `img` is dark; panics unless exactly one is
pub fn dark_quadrant(img: &GrayImage) -> &'static str {
    let (w, h) = img.dimensions();
    let quadrants = [
        ("top-left", w / 4, h / 4),
        ("top-right", 3 * w / 4, h / 4),
        ("bottom-left", w / 4, 3 * h / 4),
        ("bottom-right", 3 * w / 4, 3 * h / 4),
    ];

    let dark: Vec<&'static str> = quadrants
        .iter()
        .filter(|(_, x, y)| is_dark(img, *x, *y))
        .map(|(name, _, _)| *name)
        .collect();
    assert!(
        quadrants
            .iter()
            .all(|(_, x, y)| is_dark(img, *x, *y) || is_bright(img, *x, *y)),
        "quadrant centres should be clearly dark or bright"
    );
    assert_eq!(dark.len(), 1, "expected one dark quadrant, got {:?}", dark);
    dark[0]
}
