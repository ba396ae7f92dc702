use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dasp_signal::{rate, Signal};
use sonar_dsp::signal::correlate::xcorr_init;
use sonar_dsp::signal::traits::Correlate1D;
use sonar_dsp::signal::{hilbert, resample};

// Linear sweep from f0 to f1 Hz over `seconds`, sampled at `fs`.
fn chirp(f0: f64, f1: f64, seconds: f64, fs: f64) -> Vec<f32> {
    let k = (f1 - f0) / seconds / 2.0;
    (0..(seconds * fs).round() as usize)
        .map(|i| {
            let t = i as f64 / fs;
            (2.0 * std::f64::consts::PI * (k * t + f0) * t).sin() as f32
        })
        .collect()
}

fn received(len: usize, pulse: &[f32], offset: usize) -> Vec<f32> {
    let mut noise = rate(48_000.).const_hz(3_000.).sine();
    let mut rx = (0..len)
        .map(|_| 0.1 * noise.next() as f32)
        .collect::<Vec<_>>();
    for (dst, &p) in rx[offset..].iter_mut().zip(pulse) {
        *dst += p;
    }
    rx
}

fn matched_filter(c: &mut Criterion) {
    // 20 ms sweep from 2 kHz to 8 kHz at 48 kHz
    let pulse = chirp(2_000., 8_000., 0.02, 48_000.);
    let rx = received(8192, &pulse, 3000);
    let filter = xcorr_init(&pulse, 8192).expect("filter");

    c.bench_function("xcorr_8192", |b| {
        let mut buf = rx.clone();
        b.iter(|| {
            buf.copy_from_slice(&rx);
            filter.run_in_place(black_box(buf.as_mut_slice())).expect("sized");
        });
    });
}

fn derived(c: &mut Criterion) {
    let pulse = chirp(2_000., 8_000., 0.02, 48_000.);
    let rx = received(8192, &pulse, 3000);

    c.bench_function("hilbert_8192", |b| {
        b.iter(|| black_box(hilbert(&rx, 8192).expect("fits")));
    });
    c.bench_function("resample_8192_x4", |b| {
        b.iter(|| black_box(resample(&rx, 8192, 4096, 4, 48_000., 24_000.).expect("fits")));
    });
}

criterion_group!(benches, matched_filter, derived);
criterion_main!(benches);
