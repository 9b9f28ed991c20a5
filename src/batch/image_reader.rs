//! Image reader backed by the `image` crate.
//!
//! The format is sniffed from the file contents, not the extension. Any
//! pixel format is converted to 8-bit RGB; alpha is dropped and wider
//! samples are scaled down.

use tracing::debug;

use crate::batch::error::{BatchError, Result};
use crate::batch::reader::ImageReader;
use crate::batch::types::DecodedImage;

/// Decodes JPEG, PNG, TIFF, BMP and WebP, plus AVIF when built with the
/// `avif` feature. Without it, AVIF data fails with
/// [`BatchError::DecodeError`].
pub struct ImageCrateReader;

impl ImageReader for ImageCrateReader {
    fn read_rgb(&self, data: &[u8]) -> Result<DecodedImage> {
        debug!("Decoding image, {} bytes", data.len());

        let decoded = image::load_from_memory(data)
            .map_err(|e| BatchError::DecodeError(e.to_string()))?;

        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        debug!("Decoded image: {}x{}", width, height);

        Ok(DecodedImage {
            width,
            height,
            data: rgb.into_raw(),
        })
    }
}
