use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GraphConfig {
    /// Placeholder shown for resources whose cache entry has not arrived yet.
    pub loading_label: String,
    pub link_width: f32,
    pub directional_particles: u32,
    pub dag_level_distance: f32,
    /// How long the layout runs after a topology change before the embedder
    /// should call `ExplorerSession::settle`.
    pub settle_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HitTestConfig {
    pub font_size_px: f32,
    pub label_padding_ratio: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct DiagnosticsConfig {
    /// JSON-lines file for diagnostic events. Unset disables the sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub graph: GraphConfig,
    pub hit_test: HitTestConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            loading_label: "Loading...".to_string(),
            link_width: 3.0,
            directional_particles: 2,
            dag_level_distance: 100.0,
            settle_delay_ms: 500,
        }
    }
}

impl Default for HitTestConfig {
    fn default() -> Self {
        Self {
            font_size_px: 16.0,
            label_padding_ratio: 0.7,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            graph: GraphConfig::default(),
            hit_test: HitTestConfig::default(),
            logging: LoggingConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_dir("config")
    }

    /// Layers `default`, then `$RUN_MODE`, then `DISCOVERY_*` env vars.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let dir = dir.as_ref();

        let builder = Config::builder()
            .add_source(File::from(dir.join("default")))
            .add_source(File::from(dir.join(&run_mode)).required(false))
            .add_source(Environment::with_prefix("DISCOVERY").separator("__"));

        builder.build()?.try_deserialize()
    }
}
