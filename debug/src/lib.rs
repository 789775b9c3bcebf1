use tracing::start_tracing;

pub mod tracing;

/// Default log filter, `RUST_LOG` takes precedence.
pub const DEFAULT_FILTER: &str = "info";

pub fn setup_debugging() -> tracing::FlushGuard {
    #[cfg(debug_assertions)]
    std::env::set_var("RUST_BACKTRACE", "1");

    start_tracing(DEFAULT_FILTER)
}
