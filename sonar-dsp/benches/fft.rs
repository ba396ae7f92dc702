use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dasp_signal::{rate, Signal};
use rustfft::FftPlanner;
use sonar_dsp::complex::{real, Sample};
use sonar_dsp::kernel::KernelLifecycle;
use sonar_dsp::signal::fft::{FftConfig, FftKernel};
use sonar_dsp::signal::spectrum::{RealFftConfig, RealFftKernel};
use sonar_dsp::signal::traits::RealSpectrum1D;

fn tone(len: usize) -> Vec<f32> {
    // 25 Hz tone at 1666 Hz
    let mut signal = rate(1666.).const_hz(25.).sine();
    (0..len).map(|_| signal.next() as f32).collect()
}

fn fft_vs_rustfft(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft_forward");
    for size in [256usize, 1024, 8192, 65536] {
        let input = tone(size).into_iter().map(real).collect::<Vec<Sample>>();

        let kernel = FftKernel::try_new(FftConfig { size }).expect("power-of-two size");
        group.bench_with_input(BenchmarkId::new("sonar_dsp", size), &input, |b, input| {
            let mut buf = input.clone();
            b.iter(|| {
                buf.copy_from_slice(input);
                kernel.forward(black_box(&mut buf)).expect("sized buffer");
            });
        });

        let plan = FftPlanner::<f32>::new().plan_fft_forward(size);
        group.bench_with_input(BenchmarkId::new("rustfft", size), &input, |b, input| {
            let mut buf = input.clone();
            b.iter(|| {
                buf.copy_from_slice(input);
                plan.process(black_box(&mut buf));
            });
        });
    }
    group.finish();
}

fn real_spectrum_grouped(c: &mut Criterion) {
    let signal = tone(8192);
    let direct = RealFftKernel::try_new(RealFftConfig::direct(8192)).expect("direct");
    let grouped = RealFftKernel::try_new(RealFftConfig {
        block_size: 1024,
        groups: 8,
    })
    .expect("grouped");

    c.bench_function("fft_real_8192_direct", |b| {
        b.iter(|| black_box(direct.run_alloc(signal.as_slice()).expect("fits")));
    });
    c.bench_function("fft_real_8192_grouped_8x1024", |b| {
        b.iter(|| black_box(grouped.run_alloc(signal.as_slice()).expect("fits")));
    });
}

criterion_group!(benches, fft_vs_rustfft, real_spectrum_grouped);
criterion_main!(benches);
