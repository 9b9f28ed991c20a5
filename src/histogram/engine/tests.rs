use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::histogram::{
    Backend, ChannelCounter, Channel, ColourStats, CpuCounter, EngineConfig, HistogramError,
    EngineState, HistogramEngine, PixelBuffer, RenderMode, Result, HISTOGRAM_WIDTH,
};

/// Counts on the CPU unless told to fail, scribbling over `out` first.
struct FlakyCounter {
    inner: CpuCounter,
    fail: Arc<AtomicBool>,
}

impl ChannelCounter for FlakyCounter {
    fn name(&self) -> &'static str {
        "flaky"
    }

    fn count(&mut self, image: &PixelBuffer<'_>, out: &mut ColourStats) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            out.r.fill(u32::MAX);
            return Err(HistogramError::DeviceError("Mock device error".to_string()));
        }
        self.inner.count(image, out)
    }
}

fn cpu_engine() -> HistogramEngine {
    let config = EngineConfig::builder()
        .backend(Backend::Cpu)
        .worker_threads(Some(4))
        .build();
    HistogramEngine::new(config).unwrap()
}

/// Deterministic pseudo-random RGB bytes.
fn noise(width: u32, height: u32, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..width as usize * height as usize * 3)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

#[test]
fn test_engine_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<HistogramEngine>();
}

#[test]
fn test_new_engine_is_ready() {
    let engine = cpu_engine();
    assert_eq!(engine.state(), EngineState::Ready);
    assert_eq!(engine.backend_name(), "cpu");
}

#[test]
fn test_results_before_analysis_fail() {
    let mut engine = cpu_engine();

    assert!(matches!(
        engine.colour_stats(),
        Err(HistogramError::NoAnalysisPerformed)
    ));
    assert!(matches!(
        engine.histogram_image(),
        Err(HistogramError::NoAnalysisPerformed)
    ));
}

#[test]
fn test_two_pixel_scenario() {
    let mut engine = cpu_engine();
    let pixels = [255, 0, 0, 0, 255, 0];

    engine.analyse(&PixelBuffer::new(2, 1, &pixels)).unwrap();
    let stats = engine.colour_stats().unwrap();

    let mut expected = ColourStats::default();
    expected.r[255] = 1;
    expected.r[0] = 1;
    expected.g[0] = 1;
    expected.g[255] = 1;
    expected.b[0] = 2;
    assert_eq!(stats, expected);
}

#[test]
fn test_channel_sums_match_pixel_count() {
    let mut engine = cpu_engine();
    let (width, height) = (397, 211);
    let pixels = noise(width, height, 7);

    engine.analyse(&PixelBuffer::new(width, height, &pixels)).unwrap();
    let stats = engine.colour_stats().unwrap();

    for channel in Channel::ALL {
        assert_eq!(stats.total(channel), u64::from(width * height));
    }
}

#[test]
fn test_uniform_image() {
    let mut engine = cpu_engine();
    let (width, height) = (640, 480);
    let pixels: Vec<u8> = std::iter::repeat([12u8, 34, 56])
        .take((width * height) as usize)
        .flatten()
        .collect();

    engine.analyse(&PixelBuffer::new(width, height, &pixels)).unwrap();
    let stats = engine.colour_stats().unwrap();

    assert_eq!(stats.r[12], width * height);
    assert_eq!(stats.g[34], width * height);
    assert_eq!(stats.b[56], width * height);
    assert_eq!(stats.r.iter().filter(|&&c| c != 0).count(), 1);
    assert_eq!(stats.g.iter().filter(|&&c| c != 0).count(), 1);
    assert_eq!(stats.b.iter().filter(|&&c| c != 0).count(), 1);
}

#[test]
fn test_ramp_fills_every_bin_once() {
    let mut engine = cpu_engine();
    let pixels: Vec<u8> = (0..=255u8).flat_map(|v| [v, v, v]).collect();

    engine.analyse(&PixelBuffer::new(256, 1, &pixels)).unwrap();
    let stats = engine.colour_stats().unwrap();

    assert!(stats.r.iter().all(|&c| c == 1));
    assert!(stats.g.iter().all(|&c| c == 1));
    assert!(stats.b.iter().all(|&c| c == 1));
}

#[test]
fn test_ramp_histogram_is_full_width_block() {
    let config = EngineConfig::builder()
        .backend(Backend::Cpu)
        .histogram_height(32)
        .build();
    let mut engine = HistogramEngine::new(config).unwrap();
    let pixels: Vec<u8> = (0..=255u8).flat_map(|v| [v, v, v]).collect();

    engine.analyse(&PixelBuffer::new(256, 1, &pixels)).unwrap();
    let image = engine.histogram_image().unwrap();

    assert_eq!(image.width, HISTOGRAM_WIDTH);
    assert_eq!(image.height, 32);
    assert_eq!(image.data.len(), 256 * 32 * 3);
    for x in 0..HISTOGRAM_WIDTH {
        assert_eq!(image.pixel(x, 0), [0, 0, 0]);
        for y in 1..32 {
            assert_eq!(image.pixel(x, y), [255, 255, 255]);
        }
    }
}

#[test]
fn test_identical_input_gives_identical_output_across_engines() {
    let (width, height) = (123, 77);
    let pixels = noise(width, height, 99);
    let buffer = PixelBuffer::new(width, height, &pixels);

    let mut first = cpu_engine();
    let mut second = HistogramEngine::new(
        EngineConfig::builder()
            .backend(Backend::Cpu)
            .worker_threads(Some(1))
            .build(),
    )
    .unwrap();

    first.analyse(&buffer).unwrap();
    second.analyse(&buffer).unwrap();

    assert_eq!(first.colour_stats().unwrap(), second.colour_stats().unwrap());
    assert_eq!(
        first.histogram_image().unwrap(),
        second.histogram_image().unwrap()
    );
}

#[test]
fn test_eager_and_lazy_render_agree() {
    let (width, height) = (64, 64);
    let pixels = noise(width, height, 3);
    let buffer = PixelBuffer::new(width, height, &pixels);

    let mut lazy = cpu_engine();
    let mut eager = HistogramEngine::new(
        EngineConfig::builder()
            .backend(Backend::Cpu)
            .render_mode(RenderMode::Eager)
            .build(),
    )
    .unwrap();

    lazy.analyse(&buffer).unwrap();
    eager.analyse(&buffer).unwrap();

    assert_eq!(lazy.state(), EngineState::Analysed { rendered: false });
    assert_eq!(eager.state(), EngineState::Analysed { rendered: true });
    assert_eq!(lazy.histogram_image().unwrap(), eager.histogram_image().unwrap());
    assert_eq!(lazy.state(), EngineState::Analysed { rendered: true });
}

#[test]
fn test_second_analysis_supersedes_first() {
    let mut engine = cpu_engine();

    engine
        .analyse(&PixelBuffer::new(2, 2, &[10u8; 12]))
        .unwrap();
    let first_image = engine.histogram_image().unwrap();

    engine
        .analyse(&PixelBuffer::new(1, 3, &[200u8; 9]))
        .unwrap();
    let stats = engine.colour_stats().unwrap();

    assert_eq!(stats.r[10], 0);
    assert_eq!(stats.r[200], 3);
    assert_eq!(stats.total(Channel::Green), 3);

    let second_image = engine.histogram_image().unwrap();
    assert_ne!(first_image, second_image);
    assert_eq!(second_image.pixel(10, second_image.height - 1), [0, 0, 0]);
    assert_eq!(second_image.pixel(200, second_image.height - 1), [255, 255, 255]);
}

#[test]
fn test_invalid_input_keeps_prior_results() {
    let mut engine = cpu_engine();
    engine
        .analyse(&PixelBuffer::new(1, 1, &[1, 2, 3]))
        .unwrap();
    let stats_before = engine.colour_stats().unwrap();
    let image_before = engine.histogram_image().unwrap();

    let result = engine.analyse(&PixelBuffer::new(2, 2, &[0u8; 11]));
    assert!(matches!(result, Err(HistogramError::InvalidInput(_))));

    let result = engine.analyse(&PixelBuffer::new(0, 2, &[]));
    assert!(matches!(result, Err(HistogramError::InvalidInput(_))));

    assert_eq!(engine.colour_stats().unwrap(), stats_before);
    assert_eq!(engine.histogram_image().unwrap(), image_before);
}

#[test]
fn test_invalid_input_before_any_analysis_stays_ready() {
    let mut engine = cpu_engine();

    let result = engine.analyse(&PixelBuffer::new(3, 3, &[0u8; 3]));
    assert!(matches!(result, Err(HistogramError::InvalidInput(_))));
    assert_eq!(engine.state(), EngineState::Ready);
    assert!(matches!(
        engine.colour_stats(),
        Err(HistogramError::NoAnalysisPerformed)
    ));
}

#[test]
fn test_device_failure_keeps_prior_results() {
    let fail = Arc::new(AtomicBool::new(false));
    let counter = FlakyCounter {
        inner: CpuCounter::new(),
        fail: fail.clone(),
    };
    let mut engine =
        HistogramEngine::with_counter(EngineConfig::default(), Box::new(counter)).unwrap();
    assert_eq!(engine.backend_name(), "flaky");

    engine
        .analyse(&PixelBuffer::new(1, 1, &[9, 9, 9]))
        .unwrap();
    let stats_before = engine.colour_stats().unwrap();

    fail.store(true, Ordering::SeqCst);
    let result = engine.analyse(&PixelBuffer::new(1, 1, &[1, 1, 1]));
    assert!(matches!(result, Err(HistogramError::DeviceError(_))));
    assert_eq!(engine.colour_stats().unwrap(), stats_before);

    // The instance is still usable afterwards.
    fail.store(false, Ordering::SeqCst);
    engine
        .analyse(&PixelBuffer::new(1, 1, &[1, 1, 1]))
        .unwrap();
    assert_eq!(engine.colour_stats().unwrap().r[1], 1);
    assert_eq!(engine.colour_stats().unwrap().r.iter().sum::<u32>(), 1);
}

#[test]
fn test_returned_copies_are_independent() {
    let mut engine = cpu_engine();
    engine
        .analyse(&PixelBuffer::new(1, 1, &[5, 6, 7]))
        .unwrap();

    let mut stats = engine.colour_stats().unwrap();
    stats.r[5] = 1000;
    let mut image = engine.histogram_image().unwrap();
    image.data.fill(42);

    assert_eq!(engine.colour_stats().unwrap().r[5], 1);
    assert_ne!(engine.histogram_image().unwrap().data, image.data);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = EngineConfig::builder()
        .backend(Backend::Cpu)
        .histogram_height(0)
        .build();
    assert!(matches!(
        HistogramEngine::new(config),
        Err(HistogramError::InvalidConfig(_))
    ));
}

#[cfg(not(cuda_histogram))]
#[test]
fn test_cuda_backend_unavailable_without_cuda_build() {
    let config = EngineConfig::builder().backend(Backend::Cuda).build();
    assert!(matches!(
        HistogramEngine::new(config),
        Err(HistogramError::DeviceUnavailable(_))
    ));
}

#[cfg(not(cuda_histogram))]
#[test]
fn test_auto_backend_falls_back_to_cpu() {
    let engine = HistogramEngine::new(EngineConfig::default()).unwrap();
    assert_eq!(engine.backend_name(), "cpu");
}

