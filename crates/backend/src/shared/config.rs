use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::PathBuf;

use crate::dashboards::d400_sales_analytics::trend;

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    /// Where the configuration came from (for the startup log)
    #[serde(skip)]
    pub source: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory with the built frontend (served as fallback); relative
    /// paths resolve next to the executable
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// EnvFilter directive, overridden by RUST_LOG
    pub level: String,
    /// Log directory; relative paths resolve next to the executable
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,tower_http=warn".to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    /// Window of the trailing rolling mean on trend charts
    pub rolling_window: usize,
    /// Upload size limit in megabytes
    pub max_upload_mb: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            rolling_window: trend::DEFAULT_WINDOW,
            max_upload_mb: 20,
        }
    }
}

impl AnalyticsConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000
static_dir = "dist"

[logging]
level = "info,tower_http=warn"

[analytics]
rolling_window = 3
max_upload_mb = 20
"#;

/// Load configuration from config.toml
///
/// Search order:
/// 1. Next to the executable (copied there by build.rs)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Some(config_path) = exe_dir().map(|dir| dir.join("config.toml")) {
        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let mut config: Config = toml::from_str(&contents)?;
            config.source = config_path.display().to_string();
            return Ok(config);
        }
    }

    let mut config: Config = toml::from_str(DEFAULT_CONFIG)?;
    config.source = "embedded defaults".to_string();
    Ok(config)
}

/// Store the configuration for the rest of the process
pub fn set_global(config: Config) {
    if CONFIG.set(config).is_err() {
        tracing::warn!("Configuration already initialized, keeping the first one");
    }
}

/// Analytics settings, defaults when the configuration was never stored
pub fn analytics() -> AnalyticsConfig {
    CONFIG
        .get()
        .map(|c| c.analytics.clone())
        .unwrap_or_default()
}

/// Resolve a configured path relative to the executable directory
pub fn resolve_path(path: &str) -> PathBuf {
    let candidate = PathBuf::from(path);
    if candidate.is_absolute() {
        return candidate;
    }
    match exe_dir() {
        Some(dir) => dir.join(candidate),
        None => candidate,
    }
}

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.static_dir, "dist");
        assert_eq!(config.analytics.rolling_window, 3);
    }

    #[test]
    fn test_optional_sections_default() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            static_dir = "public"
            "#,
        )
        .unwrap();
        assert_eq!(config.analytics.rolling_window, trend::DEFAULT_WINDOW);
        assert_eq!(config.analytics.max_upload_bytes(), 20 * 1024 * 1024);
        assert!(config.logging.dir.is_none());
    }

    #[test]
    fn test_resolve_relative_path_next_to_executable() {
        let resolved = resolve_path("dist");
        assert!(resolved.ends_with("dist"));
        if let Some(dir) = exe_dir() {
            assert_eq!(resolved, dir.join("dist"));
        }
    }

    #[test]
    fn test_resolve_absolute_path_unchanged() {
        let abs = if cfg!(windows) { "C:\\logs" } else { "/var/log/d400" };
        assert_eq!(resolve_path(abs), PathBuf::from(abs));
    }
}
