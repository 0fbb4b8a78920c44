//! Shared configuration for Daikin tools.
//!
//! A TOML device list with global defaults, merged with `DAIKIN_*`
//! environment variables, and translation to `daikin_core::DeviceConfig`.
//! The CLI adds `GlobalOpts`-aware overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use daikin_core::DeviceConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Settings applied to every device.
    #[serde(default)]
    pub defaults: Defaults,

    /// Known adapters, in the order they are set up.
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_noop_delay_ms")]
    pub noop_delay_ms: u64,

    #[serde(default = "default_probe")]
    pub probe_basic_info: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            debounce_ms: default_debounce_ms(),
            noop_delay_ms: default_noop_delay_ms(),
            probe_basic_info: default_probe(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
fn default_debounce_ms() -> u64 {
    200
}
fn default_noop_delay_ms() -> u64 {
    10
}
fn default_probe() -> bool {
    true
}

/// One configured adapter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceEntry {
    /// Host or `host:port`, without scheme.
    pub address: String,

    /// Optional display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Defaults {
    /// Build a core `DeviceConfig` for `address` using these defaults.
    pub fn device_config(&self, address: &str) -> DeviceConfig {
        DeviceConfig {
            timeout: Duration::from_secs(self.timeout),
            debounce: Duration::from_millis(self.debounce_ms),
            noop_delay: Duration::from_millis(self.noop_delay_ms),
            probe_basic_info: self.probe_basic_info,
            ..DeviceConfig::new(address)
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "defaults.timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Ok(())
    }
}

// ── Device list ─────────────────────────────────────────────────────

/// Reject addresses the client cannot turn into `http://{address}/`.
pub fn validate_address(address: &str) -> Result<(), ConfigError> {
    let reason = if address.is_empty() {
        Some("address is empty")
    } else if address.contains("://") {
        Some("address must not include a scheme")
    } else if address.contains(|c: char| c.is_whitespace() || c == '/') {
        Some("address must be a bare host or host:port")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::Validation {
            field: "address".into(),
            reason: format!("{reason} ('{address}')"),
        }),
        None => Ok(()),
    }
}

impl Config {
    /// Add a device. Returns `false` if the address is already listed, in
    /// which case only its name is updated (when one is given).
    pub fn add_device(&mut self, address: &str, name: Option<String>) -> Result<bool, ConfigError> {
        validate_address(address)?;

        if let Some(entry) = self.devices.iter_mut().find(|d| d.address == address) {
            if name.is_some() {
                entry.name = name;
            }
            return Ok(false);
        }

        self.devices.push(DeviceEntry {
            address: address.to_owned(),
            name,
        });
        Ok(true)
    }

    /// Remove a device by address. Returns whether anything was removed.
    pub fn remove_device(&mut self, address: &str) -> bool {
        let before = self.devices.len();
        self.devices.retain(|d| d.address != address);
        self.devices.len() != before
    }

    /// Look up a configured device by address or name.
    pub fn find_device(&self, identifier: &str) -> Option<&DeviceEntry> {
        self.devices
            .iter()
            .find(|d| d.address == identifier || d.name.as_deref() == Some(identifier))
    }

    /// Core configs for every listed device, in file order.
    pub fn device_configs(&self) -> Result<Vec<DeviceConfig>, ConfigError> {
        self.defaults.validate()?;
        self.devices
            .iter()
            .map(|entry| {
                validate_address(&entry.address)?;
                Ok(self.defaults.device_config(&entry.address))
            })
            .collect()
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "daikin-rs", "daikin").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("daikin");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file + environment. A missing file is not an
/// error; defaults apply.
///
/// Nested keys use a double underscore: `DAIKIN_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DAIKIN_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
