use thiserror::Error;

use crate::histogram::HistogramError;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode output: {0}")]
    EncodeError(String),

    #[error("Failed to scan input directory: {0}")]
    ScanError(String),

    #[error("Histogram error: {0}")]
    Histogram(#[from] HistogramError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BatchError>;
