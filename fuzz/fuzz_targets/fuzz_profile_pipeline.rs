#![no_main]
use libfuzzer_sys::{arbitrary, fuzz_target};
use roast_core::{EngineCfg, EventKind, RoastEvent, Sample, derive_series};

#[derive(Debug, arbitrary::Arbitrary)]
struct Input {
    steps: Vec<(u8, i16)>,
    drop_at: Option<u16>,
    live: bool,
}

fuzz_target!(|input: Input| {
    let mut ts = 0_i64;
    let history: Vec<Sample> = input
        .steps
        .iter()
        .map(|&(dt, v)| {
            ts += i64::from(dt % 4);
            Sample::new(ts, f64::from(v) / 10.0)
        })
        .collect();
    let drop = input
        .drop_at
        .and_then(|i| history.get(usize::from(i)))
        .map(|s| RoastEvent::at(EventKind::Drop, *s));

    let d = derive_series(&history, drop.as_ref(), &EngineCfg::default(), input.live);
    for p in d.ror.iter().chain(&d.outliers).chain(&d.filtered).chain(&d.convolved) {
        assert!(p.value.is_finite());
    }
    if let Some(drop) = drop {
        assert!(d.ror.iter().all(|p| p.timestamp <= drop.timestamp));
    }
});
