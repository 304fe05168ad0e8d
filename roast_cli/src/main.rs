//! `roast` command-line entry point.
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;

mod cli;
mod error_fmt;
mod roast;

use cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    // color-eyre only improves panic/report rendering; a second install is harmless
    let _ = color_eyre::install();

    // clap exits with code 2 on usage errors
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn run(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(&cli.config)?;
    init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging);
    tracing::debug!(config = %cli.config.display(), "config loaded");

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
            tracing::warn!(error = %e, "could not install Ctrl-C handler");
        }
    }

    match cli.cmd {
        Commands::Analyze { profile, ghost } => {
            roast::analyze(&cfg, &profile, ghost.as_deref(), cli.json)
        }
        Commands::Simulate {
            seconds,
            charge_at,
            drop_at,
            post_drop,
            noise,
            seed,
            save,
        } => {
            let args = roast::SimArgs {
                seconds,
                charge_at,
                drop_at,
                post_drop,
                noise,
                seed,
                save,
            };
            roast::simulate(&cfg, &args, cli.json, shutdown)
        }
        Commands::SelfCheck => {
            // building a session runs the same checks a real roast would
            roast_core::RoastSessionBuilder::from_config(&cfg).try_build()?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "status": "ok",
                        "channels": cfg.channels.len(),
                        "primary": cfg.primary_channel,
                    })
                );
            } else {
                println!("ok");
            }
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> eyre::Result<roast_config::Config> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config {}", path.display()))?;
    let cfg = roast_config::load_toml(&text).wrap_err("parse config TOML")?;
    cfg.validate().wrap_err("invalid configuration")?;
    Ok(cfg)
}

fn init_tracing(json: bool, level: Option<&str>, logging: &roast_config::Logging) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    // RUST_LOG wins over --log-level, which wins over [logging].level
    let level = level.or(logging.level.as_deref()).unwrap_or("warn");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries command output; logs go to stderr
    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file = logging.file.as_deref().map(|file| {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| "roast.log".into(), ToOwned::to_owned);
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        fmt::layer().json().with_ansi(false).with_writer(writer)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init();
}
