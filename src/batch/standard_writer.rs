use std::io::Write;

use image::{ExtendedColorType, ImageEncoder, codecs::png::PngEncoder};
use tracing::debug;

use crate::batch::error::{BatchError, Result};
use crate::batch::writer::AnalysisWriter;
use crate::histogram::{Channel, ColourStats, HistogramImage};

/// Writes histograms as PNG and stats as CSV.
///
/// The CSV has one line per channel (R, G, B), each holding the 256 counts
/// in bin order, every value followed by `", "`. Lines are separated by
/// `\n`; the last line has no terminator.
pub struct StandardAnalysisWriter;

impl AnalysisWriter for StandardAnalysisWriter {
    fn write_histogram(&self, image: &HistogramImage, output: &mut dyn Write) -> Result<()> {
        debug!("Encoding PNG histogram: {}x{}", image.width, image.height);

        let mut buffer = Vec::new();
        PngEncoder::new(&mut buffer)
            .write_image(&image.data, image.width, image.height, ExtendedColorType::Rgb8)
            .map_err(|e| BatchError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("PNG encoding complete");
        Ok(())
    }

    fn write_stats(&self, stats: &ColourStats, output: &mut dyn Write) -> Result<()> {
        let mut csv = String::new();
        for (i, channel) in Channel::ALL.into_iter().enumerate() {
            if i > 0 {
                csv.push('\n');
            }
            for count in stats.channel(channel) {
                csv.push_str(&count.to_string());
                csv.push_str(", ");
            }
        }

        output.write_all(csv.as_bytes())?;
        Ok(())
    }
}
