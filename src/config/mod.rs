use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_RPC: &str = "https://rpc.mainnet.taraxa.io";
pub const DEFAULT_CHAIN_ID: u64 = 841;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON-RPC endpoint
    pub rpc: String,
    pub chain_id: u64,
    pub network_name: String,
    /// Seconds between chain status refreshes
    pub status_interval_secs: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc: DEFAULT_RPC.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            network_name: "Taraxa Mainnet".to_string(),
            status_interval_secs: 30,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Apply a `--rpc` override
    pub fn with_rpc(mut self, rpc: Option<&str>) -> Self {
        if let Some(rpc) = rpc.map(str::trim).filter(|s| !s.is_empty()) {
            self.rpc = rpc.to_string();
        }
        self.rpc = normalize_http_endpoint(&self.rpc);
        self
    }
}

/// Load from the default location; a missing or broken file means defaults
pub fn load(explicit: Option<&Path>) -> Config {
    let Some(path) = explicit.map(Path::to_path_buf).or_else(config_path) else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match load_from(&path) {
        Ok(config) => config,
        Err(err) => {
            warn!(path = %path.display(), error = %format!("{:#}", err), "ignoring config file");
            Config::default()
        }
    }
}

pub fn load_from(path: &Path) -> Result<Config> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    toml::from_str::<Config>(&content).with_context(|| format!("parse config {}", path.display()))
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("TARAQ_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("taraq").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("taraq").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "taraq", "taraq")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("taraq"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("taraq"));
    }
    directories::ProjectDirs::from("io", "taraq", "taraq").map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn history_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("history.sqlite3"))
}

pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("taraq.log"))
}

fn normalize_http_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("status_interval_secs = 5").unwrap();
        assert_eq!(config.status_interval(), Duration::from_secs(5));
        assert_eq!(config.rpc, DEFAULT_RPC);
        assert_eq!(config.chain_id, 841);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = Config {
            status_interval_secs: 0,
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.status_interval(), Duration::from_secs(1));
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_rpc_override() {
        let config = Config::default().with_rpc(Some(" localhost:8545 "));
        assert_eq!(config.rpc, "https://localhost:8545");

        let config = Config::default().with_rpc(Some("http://127.0.0.1:7777"));
        assert_eq!(config.rpc, "http://127.0.0.1:7777");

        let config = Config::default().with_rpc(Some("  "));
        assert_eq!(config.rpc, DEFAULT_RPC);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "rpc = \"http://node:7777\"\nchain_id = 842\n").unwrap();
        let config = load(Some(&path));
        assert_eq!(config.rpc, "http://node:7777");
        assert_eq!(config.chain_id, 842);

        fs::write(&path, "rpc = [").unwrap();
        assert!(load_from(&path).is_err());
        assert_eq!(load(Some(&path)), Config::default());
    }
}
