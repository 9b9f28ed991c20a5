//! Histogram engine configuration types

use crate::histogram::common::error::{HistogramError, Result};

/// Height of rendered histograms unless configured otherwise.
pub const DEFAULT_HISTOGRAM_HEIGHT: u32 = 256;

/// Tallest histogram an engine will allocate (256 × 16384 RGB888 ≈ 12 MiB).
pub const MAX_HISTOGRAM_HEIGHT: u32 = 16_384;

/// Where pixel counting runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// CUDA when compiled in and a device is present, CPU otherwise
    Auto,
    /// Engine-owned rayon worker pool
    Cpu,
    /// CUDA device 0 (requires the `cuda_histogram` build)
    Cuda,
}

/// When the histogram image is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// On the first `histogram_image` call after an analysis
    Lazy,
    /// As part of every `analyse` call
    Eager,
}

/// Configuration for a [`HistogramEngine`](crate::histogram::HistogramEngine)
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Counting backend
    pub backend: Backend,
    /// Rendered histogram height in pixels (width is always 256)
    pub histogram_height: u32,
    /// Worker threads for the engine's pool; `None` uses one per logical CPU
    pub worker_threads: Option<usize>,
    /// Eager or lazy rendering
    pub render_mode: RenderMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Auto,
            histogram_height: DEFAULT_HISTOGRAM_HEIGHT,
            worker_threads: None,
            render_mode: RenderMode::Lazy,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.histogram_height == 0 || self.histogram_height > MAX_HISTOGRAM_HEIGHT {
            return Err(HistogramError::InvalidConfig(format!(
                "histogram height must be between 1 and {}, got {}",
                MAX_HISTOGRAM_HEIGHT, self.histogram_height
            )));
        }
        if self.worker_threads == Some(0) {
            return Err(HistogramError::InvalidConfig(
                "worker thread count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for EngineConfig
#[derive(Default)]
pub struct EngineConfigBuilder {
    backend: Option<Backend>,
    histogram_height: Option<u32>,
    worker_threads: Option<Option<usize>>,
    render_mode: Option<RenderMode>,
}

impl EngineConfigBuilder {
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn histogram_height(mut self, height: u32) -> Self {
        self.histogram_height = Some(height);
        self
    }

    pub fn worker_threads(mut self, threads: Option<usize>) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = Some(mode);
        self
    }

    pub fn build(self) -> EngineConfig {
        let default = EngineConfig::default();
        EngineConfig {
            backend: self.backend.unwrap_or(default.backend),
            histogram_height: self.histogram_height.unwrap_or(default.histogram_height),
            worker_threads: self.worker_threads.unwrap_or(default.worker_threads),
            render_mode: self.render_mode.unwrap_or(default.render_mode),
        }
    }
}
