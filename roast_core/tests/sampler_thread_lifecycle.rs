//! Sampler thread lifecycle: threads are joined on drop and never leak.

use roast_core::mocks::{NoopProbe, ScriptedProbe};
use roast_core::error::RoastError;
use roast_core::sampler::Sampler;
use roast_traits::clock::{MonotonicClock, VirtualClock};
use std::time::Duration;

#[test]
fn sampler_thread_exits_on_drop() {
    let clock = MonotonicClock::new();
    let sampler = Sampler::spawn(NoopProbe, 10, Duration::from_millis(100), clock);

    // Give thread time to start
    std::thread::sleep(Duration::from_millis(50));

    // Drop joins the thread; this test passes if drop returns
    drop(sampler);
}

#[test]
fn multiple_samplers_dont_leak_threads() {
    let clock = MonotonicClock::new();

    for _ in 0..10 {
        let sampler = Sampler::spawn(NoopProbe, 10, Duration::from_millis(50), clock.clone());
        std::thread::sleep(Duration::from_millis(10));
        let _ = sampler.latest();
        drop(sampler);
    }
}

#[test]
fn full_channel_does_not_block_shutdown() {
    // The thread produces faster than anyone consumes and parks on a full
    // channel; drop must still return.
    let probe = ScriptedProbe::new("BT", (0..1000).map(f64::from));
    let sampler = Sampler::spawn(probe, 1, Duration::from_millis(10), VirtualClock::new());
    std::thread::sleep(Duration::from_millis(20));

    let start = std::time::Instant::now();
    drop(sampler);
    assert!(
        start.elapsed() < Duration::from_millis(200),
        "shutdown took {:?}",
        start.elapsed()
    );
}

#[test]
fn readings_arrive_in_order_then_exhaustion_is_reported() {
    let probe = ScriptedProbe::new("BT", [180.0, 181.0, 182.0]);
    let sampler = Sampler::spawn(probe, 1, Duration::from_millis(10), VirtualClock::new());

    let mut values = Vec::new();
    let mut arrivals = Vec::new();
    loop {
        match sampler.next(Duration::from_secs(2)) {
            Some(Ok(r)) => {
                values.push(r.readings["BT"]);
                arrivals.push(r.arrival_ms);
            }
            Some(Err(e)) => {
                assert!(matches!(e, RoastError::Exhausted));
                break;
            }
            None => panic!("sampler went quiet"),
        }
    }
    assert_eq!(values, vec![180.0, 181.0, 182.0]);
    assert_eq!(arrivals, vec![0, 1000, 2000]);
    assert_eq!(sampler.stalled_for(2000), 0);
}
