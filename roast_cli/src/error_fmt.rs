//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use roast_core::error::{BuildError, RoastError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingChannels => {
                "What happened: No probe channels were configured.\nLikely causes: The config has no [[channel]] entries.\nHow to fix: Add at least a BT channel to the config.".to_string()
            }
            BuildError::UnknownPrimary(id) => format!(
                "What happened: Primary channel '{id}' is not configured.\nLikely causes: primary_channel does not match any [[channel]] id.\nHow to fix: Fix primary_channel or add the channel."
            ),
            BuildError::DuplicateChannel(id) => format!(
                "What happened: Channel '{id}' is configured twice.\nLikely causes: Copy-pasted [[channel]] block.\nHow to fix: Give every channel a unique id."
            ),
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/roast_config.toml for a sample."
            ),
        };
    }

    if let Some(re) = err.downcast_ref::<RoastError>() {
        return match re {
            RoastError::Timeout => "What happened: Probe read timed out.\nLikely causes: Thermocouple bridge unplugged, wrong port, or read timeout too low.\nHow to fix: Check the probe connection and consider increasing sampling.read_timeout_ms in the config.".to_string(),
            RoastError::Profile(msg) => format!(
                "What happened: The roast profile is invalid ({msg}).\nLikely causes: File is not a roast profile, was truncated, or has out-of-order samples.\nHow to fix: Re-export the profile or pick another file."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read ({msg}).\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass --config with the path to a roast_config.toml."
        );
    }

    if lower.contains("parse config") || lower.contains("invalid configuration") {
        let detail = err.chain().last().map(ToString::to_string).unwrap_or_default();
        return format!(
            "What happened: Configuration is invalid or incomplete ({detail}).\nLikely causes: Missing [[channel]] entries, or out-of-range values.\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 probe timeout, 4 invalid profile, 1 anything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use roast_core::error::RoastError;
    match err.downcast_ref::<RoastError>() {
        Some(RoastError::Timeout) => 3,
        Some(RoastError::Profile(_)) => 4,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    use roast_core::error::{BuildError, RoastError};
    if err.downcast_ref::<BuildError>().is_some() {
        return "InvalidConfig";
    }
    match err.downcast_ref::<RoastError>() {
        Some(RoastError::Timeout) => "ProbeTimeout",
        Some(RoastError::Profile(_)) => "InvalidProfile",
        Some(RoastError::Config(_)) => "InvalidConfig",
        Some(_) => "RoastError",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
