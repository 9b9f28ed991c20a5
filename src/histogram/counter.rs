//! Channel counting backends
//!
//! Every backend fills the same three 256-bin tables. The CPU backend is
//! always available; the CUDA one only in `cuda_histogram` builds.

mod backend;
mod cpu_counter;
#[cfg(cuda_histogram)]
mod cuda_counter;

pub use backend::ChannelCounter;
pub use cpu_counter::CpuCounter;
#[cfg(cuda_histogram)]
pub use cuda_counter::CudaCounter;

/// Whether a CUDA device can be used by this build.
#[cfg(cuda_histogram)]
pub fn cuda_available() -> bool {
    cuda_counter::device_count() > 0
}

#[cfg(not(cuda_histogram))]
pub fn cuda_available() -> bool {
    false
}
