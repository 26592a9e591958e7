use std::sync::Once;

/// Filter applied when neither the config nor `RUST_LOG` provides one.
///
/// wgpu's internals are chatty at `info`.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "triangle_engine=debug,wgpu_core=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Resolves the filter string: explicit config, then `RUST_LOG`, then the default.
pub fn resolve_filter(config: &LoggingConfig, rust_log: Option<String>) -> String {
    let non_blank = |f: &String| !f.trim().is_empty();

    config
        .env_filter
        .clone()
        .filter(non_blank)
        .or_else(|| rust_log.filter(non_blank))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Initializes the global logger once; later calls are ignored.
///
/// Call early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(&config, std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        // Another logger may already be installed (tests, embedding hosts).
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized with filter \"{filter}\"");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let config = LoggingConfig {
            env_filter: Some("debug".into()),
            ..Default::default()
        };
        assert_eq!(resolve_filter(&config, Some("warn".into())), "debug");
    }

    #[test]
    fn rust_log_used_without_explicit_filter() {
        let config = LoggingConfig::default();
        assert_eq!(resolve_filter(&config, Some("warn".into())), "warn");
    }

    #[test]
    fn blank_explicit_filter_falls_back_to_rust_log() {
        let config = LoggingConfig {
            env_filter: Some(" ".into()),
            ..Default::default()
        };
        assert_eq!(resolve_filter(&config, Some("warn".into())), "warn");
    }

    #[test]
    fn default_filter_when_nothing_set() {
        let config = LoggingConfig::default();
        assert_eq!(resolve_filter(&config, None), DEFAULT_FILTER);
        assert_eq!(resolve_filter(&config, Some("  ".into())), DEFAULT_FILTER);
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::default());
    }
}
