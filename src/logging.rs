use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` directives, plus `check_tcp=<level>` from the settings.
fn filter(level: tracing::Level) -> Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive(format!("check_tcp={}", level.as_str().to_lowercase()).parse()?))
}

/// Logs go to stderr; stdout only carries report lines.
pub fn init_logging(level: tracing::Level) -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter(level)?)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {}", e))
}
