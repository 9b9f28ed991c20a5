//! Bar-chart rendering of [`ColourStats`].
//!
//! Column `v` holds the three bars of bin `v`. Bar heights are scaled against
//! the largest count of all channels so the tallest bar is `height - 1` rows.
//! Each channel lights only its own component, so overlapping bars add up
//! (red + green = yellow, all three = white) and the rest stays black.

use rayon::prelude::*;

use crate::histogram::types::{BINS, CHANNELS, Channel, ColourStats, HISTOGRAM_WIDTH};

/// Bar height in rows for every bin of every channel.
fn bar_heights(stats: &ColourStats, height: u32) -> [[u32; BINS]; 3] {
    let mut bars = [[0u32; BINS]; 3];
    let max = stats.max_count();
    if max == 0 || height == 0 {
        return bars;
    }

    let rows = f64::from(height - 1);
    let max = f64::from(max);
    for channel in Channel::ALL {
        let counts = stats.channel(channel);
        for (bar, &count) in bars[channel.offset()].iter_mut().zip(counts.iter()) {
            *bar = (f64::from(count) * rows / max).round() as u32;
        }
    }
    bars
}

/// Renders `stats` into `pixels`, a `256 × height` RGB888 buffer.
///
/// Every byte of `pixels` is written. Rows are filled in parallel on the
/// current rayon pool.
pub fn render_into(stats: &ColourStats, height: u32, pixels: &mut [u8]) {
    let row_len = HISTOGRAM_WIDTH as usize * CHANNELS;
    debug_assert_eq!(pixels.len(), row_len * height as usize);

    let bars = bar_heights(stats, height);

    pixels
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            // Level 1 is the bottom row; the top row (level `height`) is never lit.
            let level = height - y as u32;
            for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
                for channel in Channel::ALL {
                    let c = channel.offset();
                    px[c] = if bars[c][x] >= level { u8::MAX } else { 0 };
                }
            }
        });
}
