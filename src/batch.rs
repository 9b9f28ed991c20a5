//! Batch processing module
//!
//! Walks a directory tree, decodes every supported image to RGB888, runs it
//! through a [`HistogramEngine`](crate::histogram::HistogramEngine) and writes
//! `<path>_hist.png` or `<path>_stats.csv` next to the source file.

mod error;
mod types;
mod reader;
mod image_reader;
mod writer;
mod standard_writer;
mod scan;
mod pipeline;


pub use error::{BatchError, Result};
pub use types::{BatchMode, DecodedImage};
pub use reader::ImageReader;
pub use image_reader::ImageCrateReader;
pub use writer::AnalysisWriter;
pub use standard_writer::StandardAnalysisWriter;
pub use scan::{find_images, is_supported, AVIF_EXTENSION, SUPPORTED_EXTENSIONS};
pub use pipeline::{output_path, BatchPipeline};
