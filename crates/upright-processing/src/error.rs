//! Per-file processing errors

use std::io;

/// Failure while processing one file; never aborts the batch
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("not a JPEG file: {0}")]
    Container(#[from] img_parts::Error),

    /// Reported for the file, which is still re-encoded with its block as stored
    #[error("unreadable EXIF metadata: {0}")]
    Metadata(String),

    #[error("decode failed: {0}")]
    Decode(#[source] image::ImageError),

    #[error("encode failed: {0}")]
    Encode(#[source] image::ImageError),

    #[error("could not replace original file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl From<exif::Error> for ProcessError {
    fn from(err: exif::Error) -> Self {
        ProcessError::Metadata(err.to_string())
    }
}
