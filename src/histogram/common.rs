//! Common utilities module
//!
//! This module contains shared utilities used across the histogram engine.

pub mod error;

pub use error::{HistogramError, Result};
