use std::io::Write;
use crate::batch::error::Result;
use crate::histogram::{ColourStats, HistogramImage};

pub trait AnalysisWriter {
    fn write_histogram(&self, image: &HistogramImage, output: &mut dyn Write) -> Result<()>;
    fn write_stats(&self, stats: &ColourStats, output: &mut dyn Write) -> Result<()>;
}
