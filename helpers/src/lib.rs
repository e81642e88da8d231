use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "faregate=debug";

/// Initialize logging for a given demo.
///
/// Controller events are only emitted when `faregate` is built with the
/// `tracing` feature. `RUST_LOG` overrides the default of logging the gate at
/// debug level, e.g. `RUST_LOG=faregate=trace` to also see backlog traffic.
pub fn init_logging() {
    use tracing_subscriber::prelude::*;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_names(true)
                .compact(),
        )
        .init();
}
