//! Batch processing types

use crate::histogram::PixelBuffer;

/// What a batch run writes for each image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    /// Rendered histogram as `<path>_hist.png`
    Histogram,
    /// Raw counts as `<path>_stats.csv`
    Stats,
}

impl BatchMode {
    /// Suffix appended to the full input path, extension included.
    pub fn output_suffix(self) -> &'static str {
        match self {
            BatchMode::Histogram => "_hist.png",
            BatchMode::Stats => "_stats.csv",
        }
    }
}

/// Decoded image converted to RGB888
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Width of the image in pixels
    pub width: u32,
    /// Height of the image in pixels
    pub height: u32,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub data: Vec<u8>,
}

impl DecodedImage {
    pub fn as_pixel_buffer(&self) -> PixelBuffer<'_> {
        PixelBuffer::new(self.width, self.height, &self.data)
    }
}
