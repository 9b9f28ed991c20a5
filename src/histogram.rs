//! Histogram engine module
//!
//! Counts per-channel intensities of RGB888 images in parallel and renders
//! the three 256-bin tables as an overlaid bar chart.

pub mod common;
pub mod types;
pub mod config;
pub mod counter;
pub mod renderer;
pub mod engine;

pub use common::{
    HistogramError,
    Result,
};

pub use types::{
    Channel,
    ColourStats,
    HistogramImage,
    PixelBuffer,
    BINS,
    HISTOGRAM_WIDTH,
};

pub use config::{
    Backend,
    EngineConfig,
    EngineConfigBuilder,
    RenderMode,
    DEFAULT_HISTOGRAM_HEIGHT,
    MAX_HISTOGRAM_HEIGHT,
};

pub use counter::{
    ChannelCounter,
    CpuCounter,
};

#[cfg(cuda_histogram)]
pub use counter::CudaCounter;

pub use renderer::render_into;

pub use engine::{EngineState, HistogramEngine};
