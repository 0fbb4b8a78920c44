//! CLI-side configuration: applies `GlobalOpts` overrides on top of the
//! shared `daikin-config` file and yields core `DeviceConfig`s.

use daikin_config::{Config, validate_address};
use daikin_core::DeviceConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use daikin_config::{config_path, load_config, load_config_or_default, save_config};

/// Resolve the devices a command should act on.
///
/// `--device` values replace the configured list; each may be an address
/// or the name of a configured device.
pub fn resolve_devices(global: &GlobalOpts) -> Result<Vec<DeviceConfig>, CliError> {
    let cfg = load_config()?;
    resolve_devices_from(&cfg, global)
}

fn resolve_devices_from(cfg: &Config, global: &GlobalOpts) -> Result<Vec<DeviceConfig>, CliError> {
    let mut defaults = cfg.defaults.clone();
    if let Some(timeout) = global.timeout {
        defaults.timeout = timeout;
    }

    let effective = if global.devices.is_empty() {
        Config {
            defaults,
            devices: cfg.devices.clone(),
        }
    } else {
        let mut selected = Config {
            defaults,
            devices: Vec::new(),
        };
        for identifier in &global.devices {
            let address = cfg
                .find_device(identifier)
                .map_or(identifier.as_str(), |entry| entry.address.as_str());
            validate_address(address)?;
            selected.add_device(address, None)?;
        }
        selected
    };

    let devices = effective.device_configs()?;
    if devices.is_empty() {
        return Err(CliError::NoDevices {
            path: config_path().display().to_string(),
        });
    }
    Ok(devices)
}
