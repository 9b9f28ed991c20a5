//! Data-parallel counting on the CPU.
//!
//! The image is split into fixed-size pixel runs that rayon hands to the
//! workers of the current pool. Each run is tallied into a private table and
//! then merged into shared atomic counters, so concurrent merges into the same
//! bin never lose an update and the totals do not depend on scheduling.

use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;
use tracing::trace;

use crate::histogram::common::error::Result;
use crate::histogram::counter::backend::ChannelCounter;
use crate::histogram::types::{BINS, CHANNELS, Channel, ColourStats, PixelBuffer};

/// Pixels tallied by one task before merging into the shared counters.
const PIXELS_PER_TASK: usize = 64 * 1024;

pub struct CpuCounter {
    // [r0..r255, g0..g255, b0..b255]
    counters: Box<[AtomicU32]>,
}

impl CpuCounter {
    pub fn new() -> Self {
        Self {
            counters: (0..BINS * CHANNELS).map(|_| AtomicU32::new(0)).collect(),
        }
    }
}

impl Default for CpuCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelCounter for CpuCounter {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn count(&mut self, image: &PixelBuffer<'_>, out: &mut ColourStats) -> Result<()> {
        for counter in self.counters.iter_mut() {
            *counter.get_mut() = 0;
        }

        let counters = &self.counters;
        image
            .pixels
            .par_chunks(PIXELS_PER_TASK * CHANNELS)
            .for_each(|run| {
                let mut local = [0u32; BINS * CHANNELS];
                for px in run.chunks_exact(CHANNELS) {
                    local[px[0] as usize] += 1;
                    local[BINS + px[1] as usize] += 1;
                    local[2 * BINS + px[2] as usize] += 1;
                }
                for (shared, &n) in counters.iter().zip(local.iter()) {
                    if n != 0 {
                        shared.fetch_add(n, Ordering::Relaxed);
                    }
                }
            });

        // par_chunks/for_each joins every task before returning.
        for channel in Channel::ALL {
            let base = channel.offset() * BINS;
            let shared = &self.counters[base..base + BINS];
            for (dst, src) in out.channel_mut(channel).iter_mut().zip(shared) {
                *dst = src.load(Ordering::Relaxed);
            }
        }

        trace!(pixels = image.pixels.len() / CHANNELS, "cpu count complete");
        Ok(())
    }
}
