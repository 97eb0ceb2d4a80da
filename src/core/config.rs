//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.lume/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LumeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub endpoint: EndpointConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EndpointConfig {
    pub url: Option<String>,
    pub bypass_tunnel_warning: Option<bool>,
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ENDPOINT: &str = "https://cathodic-fatima-unbrazen.ngrok-free.dev/generate";
pub const DEFAULT_LOG_FILE: &str = "lume.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub bypass_tunnel_warning: bool,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

/// Values supplied on the command line. `None` = flag not given.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub log_level: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.lume/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".lume").join("config.toml"))
}

/// Load config from `~/.lume/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `LumeConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<LumeConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(LumeConfig::default());
        }
    };
    load_config_from(&path)
}

/// Load config from an explicit path. Same missing-file behavior as [`load_config`].
pub fn load_config_from(path: &Path) -> Result<LumeConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(LumeConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: LumeConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = format!(
        r#"# Lume Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_level = "debug"                # "off", "error", "warn", "info", "debug", "trace"
# log_file = "{DEFAULT_LOG_FILE}"

# [endpoint]
# url = "{DEFAULT_ENDPOINT}"   # Or set LUME_ENDPOINT env var
# bypass_tunnel_warning = true       # Sends ngrok-skip-browser-warning
# timeout_secs = 120                 # Unset = no timeout
"#
    );

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &LumeConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Endpoint: CLI → env → config → default
    let endpoint = cli
        .endpoint
        .clone()
        .or_else(|| std::env::var("LUME_ENDPOINT").ok())
        .or_else(|| config.endpoint.url.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    // Log level: CLI → env → config → default. Unknown names fall through.
    let log_level = cli
        .log_level
        .as_deref()
        .and_then(parse_level)
        .or_else(|| {
            std::env::var("LUME_LOG_LEVEL")
                .ok()
                .as_deref()
                .and_then(parse_level)
        })
        .or_else(|| config.general.log_level.as_deref().and_then(parse_level))
        .unwrap_or(DEFAULT_LOG_LEVEL);

    ResolvedConfig {
        endpoint,
        bypass_tunnel_warning: config.endpoint.bypass_tunnel_warning.unwrap_or(true),
        timeout: config
            .endpoint
            .timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs),
        log_level,
        log_file: PathBuf::from(
            config
                .general
                .log_file
                .as_deref()
                .unwrap_or(DEFAULT_LOG_FILE),
        ),
    }
}

fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.parse::<LevelFilter>() {
        Ok(level) => Some(level),
        Err(_) => {
            warn!("Ignoring unknown log level '{}'", name);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = LumeConfig::default();
        assert!(config.endpoint.url.is_none());
        assert!(config.general.log_level.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = LumeConfig::default();
        let resolved = resolve(&config, &CliOverrides::default());
        assert!(resolved.bypass_tunnel_warning);
        assert_eq!(resolved.timeout, None);
        assert_eq!(resolved.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = LumeConfig {
            general: GeneralConfig {
                log_level: Some("warn".to_string()),
                log_file: Some("/tmp/lume-test.log".to_string()),
            },
            endpoint: EndpointConfig {
                url: None,
                bypass_tunnel_warning: Some(false),
                timeout_secs: Some(30),
            },
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert!(!resolved.bypass_tunnel_warning);
        assert_eq!(resolved.timeout, Some(Duration::from_secs(30)));
        assert_eq!(resolved.log_file, PathBuf::from("/tmp/lume-test.log"));
    }

    #[test]
    fn test_zero_timeout_means_no_timeout() {
        let config = LumeConfig {
            endpoint: EndpointConfig {
                timeout_secs: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(resolve(&config, &CliOverrides::default()).timeout, None);
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = LumeConfig {
            general: GeneralConfig {
                log_level: Some("info".to_string()),
                ..Default::default()
            },
            endpoint: EndpointConfig {
                url: Some("http://from-config/generate".to_string()),
                ..Default::default()
            },
        };
        let cli = CliOverrides {
            endpoint: Some("http://from-cli/generate".to_string()),
            log_level: Some("error".to_string()),
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.endpoint, "http://from-cli/generate");
        assert_eq!(resolved.log_level, LevelFilter::Error);
    }

    #[test]
    fn test_unknown_cli_level_falls_through() {
        let config = LumeConfig {
            general: GeneralConfig {
                log_level: Some("trace".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            log_level: Some("loud".to_string()),
            ..Default::default()
        };
        // Env var LUME_LOG_LEVEL is not set in the test environment.
        if std::env::var("LUME_LOG_LEVEL").is_err() {
            assert_eq!(resolve(&config, &cli).log_level, LevelFilter::Trace);
        }
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
log_level = "info"
log_file = "chat.log"

[endpoint]
url = "http://localhost:8000/generate"
bypass_tunnel_warning = false
timeout_secs = 60
"#;
        let config: LumeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level.as_deref(), Some("info"));
        assert_eq!(config.general.log_file.as_deref(), Some("chat.log"));
        assert_eq!(
            config.endpoint.url.as_deref(),
            Some("http://localhost:8000/generate")
        );
        assert_eq!(config.endpoint.bypass_tunnel_warning, Some(false));
        assert_eq!(config.endpoint.timeout_secs, Some(60));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[endpoint]
url = "http://10.0.0.2:5000/generate"
"#;
        let config: LumeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.endpoint.url.as_deref(),
            Some("http://10.0.0.2:5000/generate")
        );
        assert!(config.endpoint.timeout_secs.is_none());
        assert!(config.general.log_level.is_none());
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = std::env::temp_dir().join(format!("lume-config-test-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = fs::remove_file(&path);

        let config = load_config_from(&path).unwrap();
        assert!(config.endpoint.url.is_none());

        // The generated file is all comments, so it parses back to defaults.
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("[endpoint]"));
        let reparsed = load_config_from(&path).unwrap();
        assert!(reparsed.endpoint.url.is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("lume-config-bad-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[endpoint\nurl = ").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));

        let _ = fs::remove_dir_all(&dir);
    }
}
