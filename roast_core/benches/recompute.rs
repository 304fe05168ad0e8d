use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use roast_core::{EngineCfg, EventKind, RoastEvent, Sample, derive_series};

// Synthetic roast curve: charge dip, slow rise, additive white noise
fn synth_history(n: usize, noise_amp: f64, seed: u32) -> Vec<Sample> {
    // tiny PRNG
    let mut state = seed.max(1);
    let mut next_f64 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0)
    };
    (0..n)
        .map(|i| {
            let t = i as f64;
            let v = 60.0 + 140.0 * (-t / 12.0).exp() + 200.0 * (1.0 - (-t / 360.0).exp());
            let noise = (next_f64() * 2.0 - 1.0) * noise_amp; // [-amp, +amp]
            Sample::new(i as i64, v + noise)
        })
        .collect()
}

pub fn bench_recompute(c: &mut Criterion) {
    let mut g = c.benchmark_group("derive_series");
    // Allow quick tweaking without CLI flags (Criterion 0.5):
    //   BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p roast_core --bench recompute
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(10));
        }
    } else {
        g.sample_size(50);
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }

    let cfg = EngineCfg::default();
    // 30 minutes at 1 Hz is the longest session we expect
    for &n in &[600usize, 1800] {
        let history = synth_history(n, 0.3, 0xC0FFEE);
        let drop = RoastEvent::at(EventKind::Drop, history[n - 30]);

        g.bench_function(format!("live_{n}"), |b| {
            b.iter_batched(
                || history.clone(),
                |h| {
                    let d = derive_series(black_box(&h), None, &cfg, true);
                    black_box(d);
                },
                BatchSize::SmallInput,
            )
        });
        g.bench_function(format!("after_drop_{n}"), |b| {
            b.iter(|| black_box(derive_series(black_box(&history), Some(&drop), &cfg, false)))
        });
    }
    g.finish();
}

criterion_group!(recompute, bench_recompute);
criterion_main!(recompute);
