//! Structured logging via `tracing`.
//!
//! The host calls [`init_tracing`] once with the `logging` section of
//! [`crate::config::ModelConfig`]. Later calls are ignored, and `RUST_LOG`
//! overrides the configured filter when set.

use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// `logging` section of the model config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    /// Per-target overrides, e.g. `("dungeon_model::assets", Debug)`
    pub module_filters: Vec<(String, LogLevel)>,
    pub show_targets: bool,
    pub show_thread_ids: bool,
    pub show_file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            module_filters: vec![
                ("dungeon_model::map".to_string(), LogLevel::Info),
                ("dungeon_model::tile".to_string(), LogLevel::Info),
                ("dungeon_model::assets".to_string(), LogLevel::Info),
            ],
            show_targets: true,
            show_thread_ids: false,
            show_file_line: false,
        }
    }
}

impl TracingConfig {
    /// Directive string in `EnvFilter` syntax
    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{}={}", module, level.as_str()));
        }
        parts.join(",")
    }
}

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber (first call wins)
pub fn init_tracing(config: &TracingConfig) {
    let filter_str = config.to_env_filter_string();
    let (targets, thread_ids, file_line) = (
        config.show_targets,
        config.show_thread_ids,
        config.show_file_line,
    );
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(targets)
            .with_thread_ids(thread_ids)
            .with_file(file_line)
            .with_line_number(file_line)
            .compact();

        // A host application may already have installed a global subscriber
        let _ = subscriber.try_init();
    });
}

/// Span guard for timing an operation; the span closes on drop
pub struct TimingSpan {
    _span: tracing::span::EnteredSpan,
}

impl TimingSpan {
    pub fn new(name: &str) -> Self {
        let span = tracing::info_span!("operation", name = name);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_string() {
        let filter = TracingConfig::default().to_env_filter_string();
        assert_eq!(
            filter,
            "info,dungeon_model::map=info,dungeon_model::tile=info,dungeon_model::assets=info"
        );
    }

    #[test]
    fn test_custom_filter() {
        let config = TracingConfig {
            default_level: LogLevel::Warn,
            module_filters: vec![("dungeon_model::tile".to_string(), LogLevel::Trace)],
            ..TracingConfig::default()
        };
        assert_eq!(config.to_env_filter_string(), "warn,dungeon_model::tile=trace");
    }

    #[test]
    fn test_levels_use_lowercase_names() {
        let level: LogLevel = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(level, LogLevel::Debug);
        assert_eq!(serde_json::to_string(&LogLevel::Error).unwrap(), "\"error\"");
    }

    #[test]
    fn test_init_tracing_idempotent() {
        init_tracing(&TracingConfig::default());
        init_tracing(&TracingConfig {
            default_level: LogLevel::Trace,
            ..TracingConfig::default()
        });
    }

    #[test]
    fn test_timing_span() {
        init_tracing(&TracingConfig::default());
        let _span = TimingSpan::new("test_operation");
        tracing::debug!("inside span");
    }
}
