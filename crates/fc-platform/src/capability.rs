//! Capability tier detection.
//!
//! Desktop hosts have no API level of their own. The tier comes from the
//! `FC_API_LEVEL` environment variable, then from configuration, and defaults
//! to the modern tier.

use fc_core::Capabilities;

pub const API_LEVEL_ENV: &str = "FC_API_LEVEL";

pub fn detect_capabilities(configured_api_level: Option<u32>) -> Capabilities {
    let from_env = std::env::var(API_LEVEL_ENV).ok().and_then(|raw| {
        let parsed = raw.trim().parse::<u32>().ok();
        if parsed.is_none() {
            tracing::warn!(value = %raw, "ignoring unparsable {API_LEVEL_ENV}");
        }
        parsed
    });

    match from_env.or(configured_api_level) {
        Some(level) => {
            let capabilities = Capabilities::for_api_level(level);
            tracing::info!(level, ?capabilities, "capability tier selected");
            capabilities
        }
        None => Capabilities::modern(),
    }
}
