//! Log output for the `tessera` binary.
//!
//! Events go to stderr so that stdout carries nothing but ids or decoded
//! fields. The filter defaults to `info` and follows `RUST_LOG` when set, e.g.
//! `RUST_LOG=tessera=trace` to see a span per generated id.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()?;
    Ok(())
}
