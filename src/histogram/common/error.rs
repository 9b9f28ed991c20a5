use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistogramError {
    #[error("No usable compute device: {0}")]
    DeviceUnavailable(String),

    #[error("Invalid input image: {0}")]
    InvalidInput(String),

    #[error("No analysis has been performed yet")]
    NoAnalysisPerformed,

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("Compute device error: {0}")]
    DeviceError(String),
}

pub type Result<T> = std::result::Result<T, HistogramError>;
