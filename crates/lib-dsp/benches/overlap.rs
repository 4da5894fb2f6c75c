//! Overlap engine and Vandermonde transform benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lib_dsp::fourier::Vandermonde;
use lib_dsp::overlap::{convolve, correlate, OverlapMode};
use lib_types::Complex64;

fn bench_overlap(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlap");

    for signal_len in [1024usize, 4096, 16384].iter() {
        let signal: Vec<f64> = (0..*signal_len).map(|i| (i as f64 * 0.01).sin()).collect();
        let taps: Vec<f64> = (0..64).map(|i| (-i as f64 * 0.1).exp()).collect();

        for mode in [OverlapMode::Valid, OverlapMode::Full] {
            group.bench_with_input(
                BenchmarkId::new(format!("convolve_{}", mode), signal_len),
                &(&signal, &taps),
                |b, (s, t)| {
                    b.iter(|| {
                        let mut work = (*s).clone();
                        let range = convolve(&mut work, black_box(t.as_slice()), mode).unwrap();
                        black_box(range);
                    });
                },
            );
        }

        let complex_taps: Vec<Complex64> =
            taps.iter().map(|&t| Complex64::new(t, t * 0.5)).collect();
        let complex_signal: Vec<Complex64> = signal.iter().copied().map(Complex64::from).collect();
        group.bench_with_input(
            BenchmarkId::new("correlate_complex", signal_len),
            &(&complex_signal, &complex_taps),
            |b, (s, t)| {
                b.iter(|| {
                    let mut work = (*s).clone();
                    let mut filter = (*t).clone();
                    let range = correlate(&mut work, &mut filter, OverlapMode::Same).unwrap();
                    black_box(range);
                });
            },
        );
    }

    group.finish();
}

fn bench_vandermonde(c: &mut Criterion) {
    let mut group = c.benchmark_group("vandermonde");

    for n in [16usize, 64, 256].iter() {
        let signal: Vec<f64> = (0..*n).map(|i| (i as f64 * 0.3).cos()).collect();

        group.bench_with_input(BenchmarkId::new("build", n), n, |b, &n| {
            b.iter(|| Vandermonde::<f64>::with_len(black_box(n)).unwrap());
        });

        let dft = Vandermonde::<f64>::with_len(*n).unwrap();
        group.bench_with_input(BenchmarkId::new("apply", n), &signal, |b, s| {
            b.iter(|| dft.apply(black_box(s)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_overlap, bench_vandermonde);
criterion_main!(benches);
