use crate::batch::error::Result;
use crate::batch::types::DecodedImage;

pub trait ImageReader {
    fn read_rgb(&self, data: &[u8]) -> Result<DecodedImage>;
}
