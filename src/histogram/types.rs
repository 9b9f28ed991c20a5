//! Types shared by the counter, renderer and engine

use crate::histogram::common::error::{HistogramError, Result};

/// Number of intensity bins per channel (8-bit channels).
pub const BINS: usize = 256;

/// Width of a rendered histogram: one column per bin.
pub const HISTOGRAM_WIDTH: u32 = BINS as u32;

/// Bytes per RGB888 pixel.
pub(crate) const CHANNELS: usize = 3;

/// One of the three colour channels of an RGB888 pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Byte offset of this channel inside a pixel.
    pub fn offset(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// Borrowed view of a decoded RGB888 image.
///
/// Pixels are row-major, three bytes each, with no row padding. The view is
/// only checked when handed to [`HistogramEngine::analyse`](crate::histogram::HistogramEngine::analyse).
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    /// Width of the image in pixels
    pub width: u32,
    /// Height of the image in pixels
    pub height: u32,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub pixels: &'a [u8],
}

impl<'a> PixelBuffer<'a> {
    pub fn new(width: u32, height: u32, pixels: &'a [u8]) -> Self {
        Self { width, height, pixels }
    }

    /// Checks the dimensions against the buffer and returns the pixel count.
    ///
    /// Counters are 32-bit, so images with more than `u32::MAX` pixels are
    /// rejected as well.
    pub fn validate(&self) -> Result<u32> {
        if self.width == 0 || self.height == 0 {
            return Err(HistogramError::InvalidInput(format!(
                "dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }

        let num_pixels = u64::from(self.width) * u64::from(self.height);
        let num_pixels = u32::try_from(num_pixels).map_err(|_| {
            HistogramError::InvalidInput(format!(
                "{}x{} exceeds {} pixels",
                self.width,
                self.height,
                u32::MAX
            ))
        })?;

        let expected = num_pixels as u64 * CHANNELS as u64;
        if self.pixels.len() as u64 != expected {
            return Err(HistogramError::InvalidInput(format!(
                "expected {} bytes for {}x{} RGB888, got {}",
                expected,
                self.width,
                self.height,
                self.pixels.len()
            )));
        }

        Ok(num_pixels)
    }
}

/// Per-channel frequency tables of one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColourStats {
    pub r: [u32; BINS],
    pub g: [u32; BINS],
    pub b: [u32; BINS],
}

impl Default for ColourStats {
    fn default() -> Self {
        Self {
            r: [0; BINS],
            g: [0; BINS],
            b: [0; BINS],
        }
    }
}

impl ColourStats {
    pub fn channel(&self, channel: Channel) -> &[u32; BINS] {
        match channel {
            Channel::Red => &self.r,
            Channel::Green => &self.g,
            Channel::Blue => &self.b,
        }
    }

    pub fn channel_mut(&mut self, channel: Channel) -> &mut [u32; BINS] {
        match channel {
            Channel::Red => &mut self.r,
            Channel::Green => &mut self.g,
            Channel::Blue => &mut self.b,
        }
    }

    /// Largest count across all three channels.
    pub fn max_count(&self) -> u32 {
        self.r
            .iter()
            .chain(self.g.iter())
            .chain(self.b.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Sum of one channel's bins, i.e. the number of pixels counted.
    pub fn total(&self, channel: Channel) -> u64 {
        self.channel(channel).iter().map(|&c| u64::from(c)).sum()
    }

    pub fn clear(&mut self) {
        self.r.fill(0);
        self.g.fill(0);
        self.b.fill(0);
    }
}

/// Rendered histogram, RGB888 row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl HistogramImage {
    /// Black image of the given height, [`HISTOGRAM_WIDTH`] wide.
    pub fn blank(height: u32) -> Self {
        Self {
            width: HISTOGRAM_WIDTH,
            height,
            data: vec![0u8; HISTOGRAM_WIDTH as usize * height as usize * CHANNELS],
        }
    }

    /// RGB value at column `x`, row `y` (row 0 is the top).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}
