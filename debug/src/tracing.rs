use std::panic;

use bevy_utils::tracing::{subscriber::set_global_default, warn};
use tracing_log::LogTracer;
use tracing_subscriber::{prelude::*, registry::Registry, EnvFilter};

#[cfg(feature = "tracing-chrome")]
pub struct FlushGuard {
    _guard: tracing_chrome::FlushGuard,
}

#[cfg(not(feature = "tracing-chrome"))]
pub struct FlushGuard {}

/// Installs the global tracing subscriber.
/// Keep the returned guard alive until the end of main, the chrome trace is written when it drops.
pub fn start_tracing(default_filter: &str) -> FlushGuard {
    // source: https://github.com/bevyengine/bevy/blob/main/crates/bevy_log/src/lib.rs (LICENSE MIT)
    let old_handler = panic::take_hook();
    panic::set_hook(Box::new(move |infos| {
        eprintln!("{}", tracing_error::SpanTrace::capture());
        old_handler(infos);
    }));

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default()
        .with(filter_layer)
        .with(tracing_error::ErrorLayer::default())
        .with(tracing_subscriber::fmt::Layer::default());

    #[cfg(feature = "tracing-chrome")]
    let (subscriber, flush_guard) = {
        let mut layer = tracing_chrome::ChromeLayerBuilder::new();
        if let Ok(path) = std::env::var("TRACE_CHROME") {
            layer = layer.file(path);
        }
        let (chrome_layer, guard) = layer.build();
        (subscriber.with(chrome_layer), FlushGuard { _guard: guard })
    };

    #[cfg(not(feature = "tracing-chrome"))]
    let flush_guard = FlushGuard {};

    let logger_already_set = LogTracer::init().is_err();
    let subscriber_already_set = set_global_default(subscriber).is_err();

    match (logger_already_set, subscriber_already_set) {
        (true, true) => warn!(
            "Could not set global logger and tracing subscriber as they are already set."
        ),
        (true, _) => warn!("Could not set global logger as it is already set."),
        (_, true) => warn!("Could not set global tracing subscriber as it is already set."),
        _ => (),
    }
    flush_guard
}
