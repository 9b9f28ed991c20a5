use crate::histogram::common::error::Result;
use crate::histogram::types::{ColourStats, PixelBuffer};

pub trait ChannelCounter: Send {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Counts every pixel of an already validated `image` into `out`.
    ///
    /// `out` is overwritten completely. Implementations must reset their own
    /// counters first so nothing carries over from a previous image.
    fn count(&mut self, image: &PixelBuffer<'_>, out: &mut ColourStats) -> Result<()>;
}
