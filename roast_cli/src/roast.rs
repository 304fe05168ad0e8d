//! `analyze` and `simulate` commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use eyre::WrapErr;
use roast_core::error::{Result as CoreResult, RoastError};
use roast_core::ghost::Ghost;
use roast_core::notes::agtron_level;
use roast_core::runner::{RunParams, SamplingMode, run_with_clock};
use roast_core::util::format_elapsed;
use roast_core::{EngineCfg, EventKind, Phase, Phases, RoastEventSet, RoastSessionBuilder, Sample};
use roast_devices::{SimCfg, SimulatedRoaster};
use roast_traits::VirtualClock;

/// Test hook: make the simulated probe time out after N reads.
const STALL_ENV: &str = "ROAST_TEST_SIM_STALL_AFTER";

pub struct SimArgs {
    pub seconds: u64,
    pub charge_at: i64,
    pub drop_at: i64,
    pub post_drop: i64,
    pub noise: f64,
    pub seed: u32,
    pub save: Option<PathBuf>,
}

/// Everything printed for one roast, live or reloaded.
struct Report<'a> {
    title: &'a str,
    samples: usize,
    time_delta: i64,
    events: &'a RoastEventSet,
    phases: &'a Phases,
    last_smoothed: Option<Sample>,
    color_whole: f64,
}

fn read_profile(path: &Path) -> CoreResult<roast_config::RoastProfile> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read roast profile {}", path.display()))?;
    roast_config::load_profile_str(&text)
        .map_err(|e| eyre::Report::new(RoastError::Profile(format!("{e:#}"))))
}

pub fn analyze(
    cfg: &roast_config::Config,
    path: &Path,
    ghost: Option<&Path>,
    json: bool,
) -> CoreResult<()> {
    let profile = read_profile(path)?;
    let mut session = RoastSessionBuilder::from_config(cfg).try_build()?;
    session.load_profile(&profile)?;

    let reference = match ghost {
        Some(p) => {
            let engine = EngineCfg::from(cfg);
            Some(Ghost::from_profile_with_primary(
                &read_profile(p)?,
                &engine,
                &cfg.primary_channel,
            )?)
        }
        None => None,
    };

    let primary = session.primary();
    let report = Report {
        title: &session.notes().title,
        samples: primary.history().len(),
        time_delta: session.time_delta(),
        events: session.events(),
        phases: session.phases(),
        last_smoothed: primary.last_smoothed(),
        color_whole: session.notes().color_whole,
    };

    if json {
        let mut v = report_json(&report);
        v["weight_loss_percent"] = serde_json::json!(session.notes().weight_loss_percent());
        if let Some(g) = &reference {
            v["reference"] = serde_json::json!({
                "events": events_json(&g.events, g.time_delta),
                "phases": phases_json(&g.phases),
            });
        }
        println!("{v}");
    } else {
        print_report(&report);
        if let Some(g) = &reference {
            println!("Reference phases:");
            print_phases(&g.phases);
        }
    }
    Ok(())
}

pub fn simulate(
    cfg: &roast_config::Config,
    args: &SimArgs,
    json: bool,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<()> {
    let mut session = RoastSessionBuilder::from_config(cfg).try_build()?;
    let stall_after = std::env::var(STALL_ENV)
        .ok()
        .and_then(|s| s.parse::<u64>().ok());
    let probe = SimulatedRoaster::new(SimCfg {
        charge_at: args.charge_at,
        drop_at: Some(args.drop_at),
        noise: args.noise,
        seed: args.seed,
        stall_after,
    });

    // the simulator advances one second per read
    let mut sampling = roast_core::SamplingCfg::from(&cfg.sampling);
    sampling.sample_rate_hz = 1;
    let params = RunParams {
        sampling,
        mode: SamplingMode::Direct,
        max_duration: Duration::from_secs(args.seconds),
        post_drop_secs: args.post_drop,
        shutdown: Some(shutdown),
    };
    let summary = run_with_clock(probe, &mut session, params, VirtualClock::new())?;

    if let Some(path) = &args.save {
        session.save_profile(path)?;
    }

    let report = Report {
        title: "simulated roast",
        samples: summary.samples,
        time_delta: session.time_delta(),
        events: &summary.events,
        phases: &summary.phases,
        last_smoothed: summary.last_smoothed,
        color_whole: 0.0,
    };
    if json {
        let mut v = report_json(&report);
        v["stop"] = serde_json::json!(format!("{:?}", summary.stop));
        v["alarms_fired"] = serde_json::json!(summary.alarms_fired);
        if let Some(path) = &args.save {
            v["saved"] = serde_json::json!(path.display().to_string());
        }
        println!("{v}");
    } else {
        print_report(&report);
        for t in &summary.alarms_fired {
            println!("Alarm {t:.1}°C");
        }
        println!("Stopped: {:?}", summary.stop);
        if let Some(path) = &args.save {
            println!("Saved: {}", path.display());
        }
    }
    Ok(())
}

// ── Text output ─────────────────────────────────────────────────────────────

fn print_report(r: &Report<'_>) {
    if !r.title.is_empty() {
        println!("Roast: {}", r.title);
    }
    println!("Samples: {}", r.samples);
    println!("Events:");
    for ev in r.events.iter() {
        println!(
            "  {:<9} {}  {:6.1}",
            ev.kind.as_str(),
            format_elapsed(ev.timestamp + r.time_delta),
            ev.value
        );
    }
    println!("Phases:");
    print_phases(r.phases);
    if let Some(s) = r.last_smoothed {
        println!(
            "Smoothed ROR: {:.1}/min at {}",
            s.value,
            format_elapsed(s.timestamp + r.time_delta)
        );
    }
    if r.color_whole > 0.0 {
        println!("Color: {:.0} ({})", r.color_whole, agtron_level(r.color_whole));
    }
}

fn print_phases(p: &Phases) {
    let row = |name: &str, ph: &Phase| {
        println!(
            "  {:<12} {}  {:5.1}%  {:+6.1}°",
            name,
            format_elapsed(ph.duration_secs),
            ph.percent,
            ph.temp_rise
        );
    };
    row("Drying", &p.dry);
    row("Maillard", &p.maillard);
    row("Development", &p.develop);
}

// ── JSON output ─────────────────────────────────────────────────────────────

fn events_json(events: &RoastEventSet, time_delta: i64) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for ev in events.iter() {
        map.insert(
            ev.kind.as_str().to_string(),
            serde_json::json!({
                "timestamp": ev.timestamp,
                "value": ev.value,
                "elapsed": format_elapsed(ev.timestamp + time_delta),
            }),
        );
    }
    serde_json::Value::Object(map)
}

fn phase_json(p: &Phase) -> serde_json::Value {
    serde_json::json!({
        "duration_secs": p.duration_secs,
        "percent": p.percent,
        "temp_rise": p.temp_rise,
    })
}

fn phases_json(p: &Phases) -> serde_json::Value {
    serde_json::json!({
        "dry": phase_json(&p.dry),
        "maillard": phase_json(&p.maillard),
        "develop": phase_json(&p.develop),
    })
}

fn report_json(r: &Report<'_>) -> serde_json::Value {
    serde_json::json!({
        "title": r.title,
        "samples": r.samples,
        "events": events_json(r.events, r.time_delta),
        "phases": phases_json(r.phases),
        "last_smoothed": r.last_smoothed.map(|s| serde_json::json!({
            "timestamp": s.timestamp,
            "value": s.value,
        })),
        "has_drop": r.events.is_set(EventKind::Drop),
    })
}
