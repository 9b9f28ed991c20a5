use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, instrument};

use crate::histogram::{
    common::error::{HistogramError, Result},
    config::{Backend, EngineConfig, RenderMode},
    counter::{self, ChannelCounter, CpuCounter},
    renderer::render_into,
    types::{Channel, ColourStats, HistogramImage, PixelBuffer},
};

#[cfg(test)]
mod tests;

/// Where an engine is in its analysis lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Built, nothing analysed yet
    Ready,
    /// Holds the results of the latest successful `analyse`
    Analysed {
        /// Whether the histogram image matches the current stats
        rendered: bool,
    },
}

/// Counts colour intensities and renders histograms, one image at a time.
///
/// The engine owns its worker pool, counter storage and histogram buffer;
/// all are sized once here and reused by every analysis. Only the latest
/// successful analysis is kept. A failed `analyse` leaves the previous
/// results in place.
///
/// Mutating calls take `&mut self`: one engine serves one thread at a time.
/// Separate engines share nothing.
pub struct HistogramEngine {
    config: EngineConfig,
    pool: ThreadPool,
    counter: Box<dyn ChannelCounter>,
    /// Stats of the current analysis
    stats: ColourStats,
    /// Counting target; swapped with `stats` once a count succeeds
    scratch: ColourStats,
    image: HistogramImage,
    state: EngineState,
}

impl HistogramEngine {
    /// Builds an engine on the configured backend.
    ///
    /// Fails with `DeviceUnavailable` when the backend cannot be brought up;
    /// this is the only place the device is checked.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let counter: Box<dyn ChannelCounter> = match config.backend {
            Backend::Cpu => Box::new(CpuCounter::new()),
            Backend::Cuda => cuda_counter()?,
            Backend::Auto if counter::cuda_available() => cuda_counter()?,
            Backend::Auto => Box::new(CpuCounter::new()),
        };

        Self::with_counter(config, counter)
    }

    /// Builds an engine around a caller-supplied counter. `config.backend` is
    /// ignored.
    pub fn with_counter(config: EngineConfig, counter: Box<dyn ChannelCounter>) -> Result<Self> {
        config.validate()?;

        let mut builder = ThreadPoolBuilder::new()
            .thread_name(|i| format!("histogram-worker-{i}"));
        if let Some(threads) = config.worker_threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| HistogramError::DeviceUnavailable(e.to_string()))?;

        debug!(
            backend = counter.name(),
            workers = pool.current_num_threads(),
            histogram_height = config.histogram_height,
            "Histogram engine ready"
        );

        Ok(Self {
            image: HistogramImage::blank(config.histogram_height),
            config,
            pool,
            counter,
            stats: ColourStats::default(),
            scratch: ColourStats::default(),
            state: EngineState::Ready,
        })
    }

    /// Counts `image` and makes it the current analysis.
    ///
    /// Blocks until counting (and rendering, in eager mode) is done.
    #[instrument(skip(self, image), fields(width = image.width, height = image.height, backend = self.counter.name()))]
    pub fn analyse(&mut self, image: &PixelBuffer<'_>) -> Result<()> {
        let num_pixels = image.validate()?;

        {
            let Self { pool, counter, scratch, .. } = self;
            let _span = tracing::debug_span!("count_channels").entered();
            pool.install(|| counter.count(image, scratch))?;
        }

        debug_assert!(
            Channel::ALL
                .iter()
                .all(|&c| self.scratch.total(c) == u64::from(num_pixels))
        );

        std::mem::swap(&mut self.stats, &mut self.scratch);
        self.state = EngineState::Analysed { rendered: false };

        if self.config.render_mode == RenderMode::Eager {
            self.render();
        }

        debug!(pixels = num_pixels, "Analysis complete");
        Ok(())
    }

    /// Copy of the current stats.
    pub fn colour_stats(&self) -> Result<ColourStats> {
        match self.state {
            EngineState::Ready => Err(HistogramError::NoAnalysisPerformed),
            EngineState::Analysed { .. } => Ok(self.stats.clone()),
        }
    }

    /// Copy of the current histogram image, rendering it first if needed.
    pub fn histogram_image(&mut self) -> Result<HistogramImage> {
        match self.state {
            EngineState::Ready => return Err(HistogramError::NoAnalysisPerformed),
            EngineState::Analysed { rendered: false } => self.render(),
            EngineState::Analysed { rendered: true } => {}
        }
        Ok(self.image.clone())
    }

    fn render(&mut self) {
        let _span = tracing::debug_span!("render_histogram").entered();
        let Self { pool, stats, image, config, .. } = self;
        pool.install(|| render_into(stats, config.histogram_height, &mut image.data));
        self.state = EngineState::Analysed { rendered: true };
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Name of the counting backend in use ("cpu", "cuda", ...).
    pub fn backend_name(&self) -> &'static str {
        self.counter.name()
    }
}

#[cfg(cuda_histogram)]
fn cuda_counter() -> Result<Box<dyn ChannelCounter>> {
    Ok(Box::new(counter::CudaCounter::new()?))
}

#[cfg(not(cuda_histogram))]
fn cuda_counter() -> Result<Box<dyn ChannelCounter>> {
    Err(HistogramError::DeviceUnavailable(
        "built without CUDA support".to_string(),
    ))
}
