//! Inspection of uploaded print images before anything is stored.

use std::io::Cursor;

use atelier_core::catalog::validate_image_upload;
use atelier_core::error::CoreError;
use image::ImageReader;
use sha2::{Digest, Sha256};

/// An image file received with a print.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    /// Declared MIME type of the part.
    pub content_type: String,
}

/// Facts about an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectedImage {
    /// File extension for the object key.
    pub extension: &'static str,
    pub width: i32,
    pub height: i32,
    pub file_size: i64,
    /// Lower-case hex SHA-256 of the bytes.
    pub checksum_sha256: String,
}

/// Check type and size, read dimensions from the header and hash the bytes.
///
/// Only the header is decoded; the pixel data is never loaded.
pub fn inspect(upload: &ImageUpload, max_bytes: usize) -> Result<InspectedImage, CoreError> {
    let extension = validate_image_upload(&upload.content_type, upload.bytes.len(), max_bytes)?;

    let (width, height) = ImageReader::new(Cursor::new(&upload.bytes))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.into_dimensions().ok())
        .ok_or_else(|| CoreError::Validation("Uploaded file is not a readable image".into()))?;

    let to_i32 = |v: u32| {
        i32::try_from(v)
            .map_err(|_| CoreError::Validation("Image dimensions are out of range".into()))
    };

    Ok(InspectedImage {
        extension,
        width: to_i32(width)?,
        height: to_i32(height)?,
        file_size: upload.bytes.len() as i64,
        checksum_sha256: format!("{:x}", Sha256::digest(&upload.bytes)),
    })
}
