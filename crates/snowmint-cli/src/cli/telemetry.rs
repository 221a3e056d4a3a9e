//! Logging setup.
//!
//! Events are written to stderr so that stdout only ever carries IDs or
//! reports. The filter comes from `RUST_LOG` and defaults to `warn`; enable the
//! library's spans with e.g. `RUST_LOG=snowmint=trace`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_timer(fmt::time::ChronoLocal::rfc_3339()),
        )
        .try_init()?;
    Ok(())
}
