use anyhow::Context;

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::protocol::DEFAULT_ADDR;
use crate::APP_DIR_NAME;

/// Overrides `addr` from the config file.
pub const ADDR_ENV: &str = "WORD_LOOKUP_ADDR";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default = "default_addr")]
    pub addr: String,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// How long the launcher waits after spawning the app before retrying.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Explicit path of the window binary; otherwise it is searched for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_path: Option<PathBuf>,

    #[serde(default = "default_zoom")]
    pub default_zoom: f64,
}

fn default_addr() -> String {
    DEFAULT_ADDR.to_string()
}

fn default_connect_timeout_ms() -> u64 {
    1000
}

fn default_settle_delay_ms() -> u64 {
    1200
}

fn default_zoom() -> f64 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            connect_timeout_ms: default_connect_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            app_path: None,
            default_zoom: default_zoom(),
        }
    }
}

impl Config {
    /// The coordination endpoint. Only loopback addresses are accepted.
    pub fn endpoint(&self) -> SocketAddr {
        match self.addr.trim().parse::<SocketAddr>() {
            Ok(a) if a.ip().is_loopback() => a,
            Ok(a) => {
                log::warn!("config: {} is not a loopback address, using {}", a, DEFAULT_ADDR);
                DEFAULT_ADDR
            }
            Err(e) => {
                log::warn!("config: bad addr {:?} ({e}), using {}", self.addr, DEFAULT_ADDR);
                DEFAULT_ADDR
            }
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms.max(1))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    fn apply_env(mut self) -> Self {
        if let Ok(addr) = std::env::var(ADDR_ENV) {
            if !addr.trim().is_empty() {
                self.addr = addr;
            }
        }
        self
    }
}

pub fn config_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
    base.join(APP_DIR_NAME).join("config.toml")
}

pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let s = fs::read_to_string(path).context("read config")?;
    let cfg: Config = toml::from_str(&s).context("parse config")?;
    Ok(cfg)
}

/// Config from the default location plus environment overrides.
///
/// A missing file is normal; a broken one is logged. Both yield defaults.
pub fn resolve_config() -> Config {
    let path = config_path();
    let cfg = if path.exists() {
        load_config(&path).unwrap_or_else(|e| {
            log::warn!("config: {}: {e:#}, using defaults", path.display());
            Config::default()
        })
    } else {
        Config::default()
    };
    cfg.apply_env()
}

pub fn save_config(path: &Path, cfg: &Config) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("mkdir config")?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).context("write config")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let cfg = Config::default();
        assert_eq!(cfg.endpoint(), "127.0.0.1:5050".parse().unwrap());
        assert_eq!(cfg.connect_timeout(), Duration::from_secs(1));
        assert_eq!(cfg.settle_delay(), Duration::from_millis(1200));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "addr = \"127.0.0.1:6060\"\n").unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.endpoint().port(), 6060);
        assert_eq!(cfg.settle_delay_ms, 1200);
        assert_eq!(cfg.app_path, None);
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let cfg = Config {
            addr: "127.0.0.1:7070".to_string(),
            connect_timeout_ms: 250,
            settle_delay_ms: 800,
            app_path: Some(PathBuf::from("/opt/word-lookup/bin/word-lookup")),
            default_zoom: 1.5,
        };
        save_config(&path, &cfg).unwrap();
        assert_eq!(load_config(&path).unwrap(), cfg);
    }

    #[test]
    fn non_loopback_addr_is_refused() {
        let cfg = Config {
            addr: "192.168.1.10:5050".to_string(),
            ..Config::default()
        };
        assert_eq!(cfg.endpoint(), DEFAULT_ADDR);
        let cfg = Config {
            addr: "not an address".to_string(),
            ..Config::default()
        };
        assert_eq!(cfg.endpoint(), DEFAULT_ADDR);
        let cfg = Config {
            addr: "[::1]:5151".to_string(),
            ..Config::default()
        };
        assert_eq!(cfg.endpoint().port(), 5151);
    }
}
