//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.magic-mirror/config.json`) and environment.
//! Credentials default to the built-in pair so a fresh install answers the platform out of the box.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Username accepted when neither config nor environment sets one.
pub const DEFAULT_USERNAME: &str = "MagicMirror";

/// Password accepted when neither config nor environment sets one.
pub const DEFAULT_PASSWORD: &str = "rorriMcigaM";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Basic auth credentials for the action endpoint.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server bind address and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port for HTTP (default 8080).
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_server_bind")]
    pub bind: String,
}

/// The single username/password pair accepted on `/action`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Overridden by MIRROR_USERNAME env.
    #[serde(default = "default_username")]
    pub username: String,

    /// Overridden by MIRROR_PASSWORD env.
    #[serde(default = "default_password")]
    pub password: String,
}

fn default_server_port() -> u16 {
    8080
}

fn default_server_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

fn default_password() -> String {
    DEFAULT_PASSWORD.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            bind: default_server_bind(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

/// Resolve the credential pair: env MIRROR_USERNAME / MIRROR_PASSWORD override config, field by field.
pub fn resolve_credentials(config: &Config) -> (String, String) {
    let username = non_empty_env("MIRROR_USERNAME").unwrap_or_else(|| config.auth.username.clone());
    let password = non_empty_env("MIRROR_PASSWORD").unwrap_or_else(|| config.auth.password.clone());
    (username, password)
}

/// True when the resolved pair is still the compiled-in default.
pub fn uses_default_credentials(username: &str, password: &str) -> bool {
    username == DEFAULT_USERNAME && password == DEFAULT_PASSWORD
}

/// True if the bind address is loopback (127.0.0.1, ::1, etc.).
pub fn is_loopback_bind(bind: &str) -> bool {
    let b = bind.trim();
    b == "127.0.0.1" || b == "::1" || b == "localhost"
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("MIRROR_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".magic-mirror").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the given path, the default path, or MIRROR_CONFIG_PATH. Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_server_port_and_bind() {
        let s = ServerConfig::default();
        assert_eq!(s.port, 8080);
        assert_eq!(s.bind, "127.0.0.1");
    }

    #[test]
    fn empty_object_uses_default_credentials() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.auth.username, "MagicMirror");
        assert_eq!(config.auth.password, "rorriMcigaM");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn partial_auth_keeps_other_default() {
        let config: Config =
            serde_json::from_str(r#"{"auth":{"password":"hunter2"},"server":{"port":9000}}"#)
                .unwrap();
        assert_eq!(config.auth.username, DEFAULT_USERNAME);
        assert_eq!(config.auth.password, "hunter2");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind, "127.0.0.1");
    }

    #[test]
    fn default_credentials_detected() {
        assert!(uses_default_credentials("MagicMirror", "rorriMcigaM"));
        assert!(!uses_default_credentials("MagicMirror", "other"));
    }

    #[test]
    fn env_overrides_config_per_field() {
        let mut config = Config::default();
        config.auth.username = "Queen".to_string();
        config.auth.password = "apple".to_string();

        std::env::set_var("MIRROR_USERNAME", "  Huntsman  ");
        std::env::remove_var("MIRROR_PASSWORD");
        assert_eq!(
            resolve_credentials(&config),
            ("Huntsman".to_string(), "apple".to_string())
        );

        std::env::set_var("MIRROR_USERNAME", "   ");
        std::env::set_var("MIRROR_PASSWORD", "poisoned");
        assert_eq!(
            resolve_credentials(&config),
            ("Queen".to_string(), "poisoned".to_string())
        );

        std::env::remove_var("MIRROR_USERNAME");
        std::env::remove_var("MIRROR_PASSWORD");
        assert_eq!(
            resolve_credentials(&config),
            ("Queen".to_string(), "apple".to_string())
        );
    }

    #[test]
    fn loopback_binds() {
        assert!(is_loopback_bind("127.0.0.1"));
        assert!(is_loopback_bind(" localhost "));
        assert!(!is_loopback_bind("0.0.0.0"));
    }

    #[test]
    fn load_config_missing_file_is_default() {
        let path = std::env::temp_dir().join("magic-mirror-missing-config-for-test.json");
        let (config, used) = load_config(Some(path.clone())).unwrap();
        assert_eq!(used, path);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn load_config_rejects_invalid_json() {
        let path = std::env::temp_dir().join(format!(
            "magic-mirror-bad-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, b"{ not json").unwrap();
        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("parsing config"));
        let _ = std::fs::remove_file(path);
    }
}
