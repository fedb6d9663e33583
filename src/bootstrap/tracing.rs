//! Tracing configuration for filechooser
//!
//! Initializes `tracing-subscriber` with an env filter and a single fmt layer.
//! Output goes to stderr so tools printing results on stdout stay parseable.

use std::io;

use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Check if running in development environment
fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for tracing
///
/// ## Behavior / 行为
/// - **Development**: debug level for everything
/// - **Production**: info level, with the adapters kept at info as well
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    vec![
        if is_dev { "debug" } else { "info" }.to_string(),
        if is_dev { "fc_app=debug" } else { "fc_app=info" }.to_string(),
        if is_dev {
            "fc_platform=debug"
        } else {
            "fc_platform=info"
        }
        .to_string(),
    ]
}

/// Initialize the tracing subscriber
///
/// `RUST_LOG` overrides the default directives when set.
///
/// ## Errors / 错误
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber() -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives.join(",")));

    let stderr_layer = fmt::layer()
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(io::stderr);

    registry().with(env_filter).with(stderr_layer).try_init()?;

    Ok(())
}
