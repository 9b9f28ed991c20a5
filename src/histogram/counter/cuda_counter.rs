use cudarc::driver::safe::*;
use cudarc::nvrtc::Ptx;
use std::sync::Arc;
use tracing::debug;

use crate::histogram::common::error::{HistogramError, Result};
use crate::histogram::counter::backend::ChannelCounter;
use crate::histogram::types::{BINS, CHANNELS, Channel, ColourStats, PixelBuffer};

const THREADS_PER_BLOCK: u32 = 256;
/// Blocks keep a shared table each; past this many the merge dominates.
const MAX_BLOCKS: u32 = 1024;

fn device_error(e: DriverError) -> HistogramError {
    HistogramError::DeviceError(e.to_string())
}

fn device_unavailable(e: DriverError) -> HistogramError {
    HistogramError::DeviceUnavailable(e.to_string())
}

pub(super) fn device_count() -> i32 {
    CudaContext::device_count().unwrap_or(0)
}

/// CUDA counting on device 0
pub struct CudaCounter {
    stream: Arc<CudaStream>,
    kernel: CudaFunction,
    /// Device-resident [r, g, b] tables, reused across images
    counts: CudaSlice<u32>,
}

impl CudaCounter {
    /// Initialize CUDA context, load the kernel and allocate the counters
    pub fn new() -> Result<Self> {
        if device_count() < 1 {
            return Err(HistogramError::DeviceUnavailable(
                "no CUDA-capable device found".to_string(),
            ));
        }

        // Include compiled PTX from build.rs
        let ptx = include_str!(concat!(env!("OUT_DIR"), "/colour_histogram.ptx"));
        let kernel_name = "count_rgb888";

        let ctx = CudaContext::new(0).map_err(device_unavailable)?;
        let stream = ctx.default_stream();
        let module = ctx
            .load_module(Ptx::from_src(ptx))
            .map_err(device_unavailable)?;
        let kernel = module.load_function(kernel_name).map_err(device_unavailable)?;
        let counts = stream
            .alloc_zeros::<u32>(BINS * CHANNELS)
            .map_err(device_unavailable)?;

        debug!("CUDA counter ready on device 0");
        Ok(Self { stream, kernel, counts })
    }
}

impl ChannelCounter for CudaCounter {
    fn name(&self) -> &'static str {
        "cuda"
    }

    fn count(&mut self, image: &PixelBuffer<'_>, out: &mut ColourStats) -> Result<()> {
        // Copy pixels to GPU
        let d_pixels = self.stream.clone_htod(image.pixels).map_err(device_error)?;
        self.stream.memset_zeros(&mut self.counts).map_err(device_error)?;

        let num_pixels = (image.pixels.len() / CHANNELS) as u64;
        let blocks = num_pixels
            .div_ceil(u64::from(THREADS_PER_BLOCK))
            .clamp(1, u64::from(MAX_BLOCKS)) as u32;

        let mut launch_args = self.stream.launch_builder(&self.kernel);
        launch_args.arg(&d_pixels);
        launch_args.arg(&num_pixels);
        launch_args.arg(&mut self.counts);

        let cfg = LaunchConfig {
            grid_dim: (blocks, 1, 1),
            block_dim: (THREADS_PER_BLOCK, 1, 1),
            shared_mem_bytes: 0,
        };

        unsafe { launch_args.launch(cfg) }.map_err(device_error)?;

        // Copy back from GPU
        let host = self.stream.clone_dtoh(&self.counts).map_err(device_error)?;
        for channel in Channel::ALL {
            let base = channel.offset() * BINS;
            out.channel_mut(channel)
                .copy_from_slice(&host[base..base + BINS]);
        }

        Ok(())
    }
}
