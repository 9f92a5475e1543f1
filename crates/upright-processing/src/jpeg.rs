//! JPEG container handling: decode, re-encode, and carrying metadata segments
//! from the original file into the re-encoded one.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat};
use img_parts::jpeg::{Jpeg, JpegSegment};
use img_parts::ImageEXIF;

use crate::error::ProcessError;

const APP0: u8 = 0xE0;
const APP1: u8 = 0xE1;
const APP14: u8 = 0xEE;
const APP15: u8 = 0xEF;
const COM: u8 = 0xFE;

/// Segments copied from the original into the re-encoded file.
///
/// APP0 (JFIF) comes from the encoder. APP14 (Adobe) describes the colour
/// transform of the original stream and would mislabel the new one.
fn is_carried(marker: u8) -> bool {
    ((APP1..=APP15).contains(&marker) && marker != APP14) || marker == COM
}

/// Parsed JPEG container of the file being processed
pub struct JpegFile {
    container: Jpeg,
}

impl JpegFile {
    /// Parse the segment structure; fails for anything that is not a JPEG
    pub fn parse(data: Bytes) -> Result<Self, ProcessError> {
        Ok(Self {
            container: Jpeg::from_bytes(data)?,
        })
    }

    /// Raw TIFF payload of the EXIF APP1 segment, without the `Exif\0\0` prefix
    pub fn exif(&self) -> Option<Bytes> {
        self.container.exif()
    }

    pub fn set_exif(&mut self, exif: Option<Bytes>) {
        self.container.set_exif(exif);
    }

    /// Serialise the container as it stands, entropy data untouched
    pub fn into_bytes(self) -> Bytes {
        self.container.encoder().bytes()
    }

    /// Metadata segments to carry over, in their original order
    pub fn metadata_segments(&self) -> Vec<JpegSegment> {
        self.container
            .segments()
            .iter()
            .filter(|segment| is_carried(segment.marker()))
            .cloned()
            .collect()
    }
}

/// Decode JPEG data into pixels. No EXIF orientation is applied here.
pub fn decode(data: &[u8]) -> Result<DynamicImage, ProcessError> {
    image::load_from_memory_with_format(data, ImageFormat::Jpeg).map_err(ProcessError::Decode)
}

/// Encode pixels as baseline JPEG at `quality` (1-100)
pub fn encode(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ProcessError> {
    let mut buffer = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        match img {
            DynamicImage::ImageLuma8(gray) => encoder.encode(
                gray.as_raw(),
                gray.width(),
                gray.height(),
                ExtendedColorType::L8,
            ),
            other => {
                let rgb = other.to_rgb8();
                encoder.encode(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )
            }
        }
        .map_err(ProcessError::Encode)?;
    }

    Ok(buffer)
}

/// Replace the metadata segments of freshly `encoded` data with `metadata`.
///
/// Carried segments go right after the encoder's leading APP0 segments.
pub fn with_metadata(encoded: Vec<u8>, metadata: Vec<JpegSegment>) -> Result<Bytes, ProcessError> {
    let mut jpeg = Jpeg::from_bytes(Bytes::from(encoded))?;

    let segments = jpeg.segments_mut();
    segments.retain(|segment| !is_carried(segment.marker()));
    let insert_at = segments
        .iter()
        .take_while(|segment| segment.marker() == APP0)
        .count();
    segments.splice(insert_at..insert_at, metadata);

    Ok(jpeg.encoder().bytes())
}
