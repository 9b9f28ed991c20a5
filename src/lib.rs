//! Per-channel colour histograms for RGB888 images.
//!
//! [`histogram`] holds the counting/rendering engine; [`batch`] walks
//! directories, decodes images and writes the `_hist.png` / `_stats.csv`
//! outputs.

pub mod batch;
pub mod histogram;
pub mod logger;
