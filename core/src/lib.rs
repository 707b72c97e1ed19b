pub mod config;
pub mod diagnostics;
pub mod error;
pub mod model;

use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// `RUST_LOG` wins over `default_level`; repeated calls are ignored.
pub fn init_tracing_with_level(default_level: &str) {
    init_tracing_from_config(&LoggingConfig {
        level: default_level.to_string(),
        json: false,
    });
}

/// Like [`init_tracing_with_level`], with the output format taken from `config`.
pub fn init_tracing_from_config(config: &LoggingConfig) {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter_layer);
    let _ = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init()
    };
}
