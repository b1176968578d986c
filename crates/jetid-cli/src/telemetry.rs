//! Log output for the `jetid` binary.
//!
//! Events go to stderr so stdout carries only command results. The filter is
//! read from `RUST_LOG` and defaults to `warn`:
//!
//! ```bash
//! RUST_LOG=jetid=trace jetid --hex 05
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()?;
    Ok(())
}
