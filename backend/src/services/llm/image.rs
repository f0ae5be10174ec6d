//! Uploaded image validation for the vision endpoint

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;

use super::models::Blob;
use crate::utils::{ApiError, ApiResult};

/// Formats the provider accepts as inline data without conversion
const PASSTHROUGH_FORMATS: &[ImageFormat] = &[ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP];

/// A decodable image ready to be inlined into a generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime_type: &'static str,
    bytes: Vec<u8>,
}

impl ImagePayload {
    /// Sniff and fully decode the upload
    ///
    /// Formats outside the passthrough list (GIF, BMP) are re-encoded as PNG.
    pub fn from_upload(bytes: Vec<u8>) -> ApiResult<Self> {
        if bytes.is_empty() {
            return Err(ApiError::MissingField("file"));
        }

        let format = image::guess_format(&bytes).map_err(ApiError::invalid_image)?;
        let decoded =
            image::load_from_memory_with_format(&bytes, format).map_err(ApiError::invalid_image)?;

        if PASSTHROUGH_FORMATS.contains(&format) {
            return Ok(Self { mime_type: format.to_mime_type(), bytes });
        }

        tracing::debug!("Re-encoding {:?} upload as PNG", format);
        let mut png = Cursor::new(Vec::new());
        decoded.write_to(&mut png, ImageFormat::Png).map_err(ApiError::invalid_image)?;
        Ok(Self { mime_type: ImageFormat::Png.to_mime_type(), bytes: png.into_inner() })
    }

    pub fn mime_type(&self) -> &str {
        self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_blob(&self) -> Blob {
        Blob { mime_type: self.mime_type.to_string(), data: STANDARD.encode(&self.bytes) }
    }
}

#[cfg(test)]
pub(crate) fn encode_test_image(format: ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 30, 30]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, format)
        .expect("encode test image");
    out.into_inner()
}
