use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use colour_histogram_rs::histogram::{
    Backend, EngineConfig, HistogramEngine, PixelBuffer, RenderMode,
};
use std::hint::black_box;

fn generate_mock_rgb_data(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            data.push((x % 256) as u8);
            data.push((y % 256) as u8);
            data.push(((x + y) % 256) as u8);
        }
    }
    data
}

fn cpu_engine(render_mode: RenderMode) -> HistogramEngine {
    let config = EngineConfig::builder()
        .backend(Backend::Cpu)
        .render_mode(render_mode)
        .build();
    HistogramEngine::new(config).expect("CPU engine")
}

fn benchmark_analyse_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyse_by_size");

    let sizes = vec![
        (640, 480, "640x480"),
        (1920, 1080, "1920x1080"),
        (6000, 4000, "6000x4000"),
    ];

    for (width, height, label) in sizes {
        let mock_data = generate_mock_rgb_data(width, height);
        let mut engine = cpu_engine(RenderMode::Lazy);

        group.bench_with_input(
            BenchmarkId::from_parameter(label),
            &mock_data,
            |b, data| {
                let buffer = PixelBuffer::new(width as u32, height as u32, data);
                b.iter(|| {
                    engine.analyse(black_box(&buffer)).unwrap();
                });
            },
        );
    }

    group.finish();
}

fn benchmark_render_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_modes");
    let mock_data = generate_mock_rgb_data(1920, 1080);

    for (mode, label) in [(RenderMode::Lazy, "lazy"), (RenderMode::Eager, "eager")] {
        let mut engine = cpu_engine(mode);

        group.bench_with_input(
            BenchmarkId::from_parameter(label),
            &mock_data,
            |b, data| {
                let buffer = PixelBuffer::new(1920, 1080, data);
                b.iter(|| {
                    engine.analyse(black_box(&buffer)).unwrap();
                    black_box(engine.histogram_image().unwrap());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_analyse_sizes, benchmark_render_modes);
criterion_main!(benches);
