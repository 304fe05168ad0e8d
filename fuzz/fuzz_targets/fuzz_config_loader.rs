#![no_main]
use libfuzzer_sys::fuzz_target;
use roast_core::{Channel, RoastSession, RoastSessionBuilder};

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    if let Ok(cfg) = toml::from_str::<roast_config::Config>(data)
        && cfg.validate().is_ok()
    {
        // a validated config must always build a session
        assert!(RoastSessionBuilder::from_config(&cfg).try_build().is_ok());
    }

    // The same bytes as a roast profile: anything that parses must load.
    if let Ok(profile) = roast_config::load_profile_str(data)
        && profile.channel("BT").is_some()
        && let Ok(mut session) = RoastSession::builder().channel(Channel::new("BT", 5)).try_build()
    {
        assert!(session.load_profile(&profile).is_ok());
    }
});
