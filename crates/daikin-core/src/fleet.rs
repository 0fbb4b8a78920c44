// ── Fleet ──
//
// A set of independently-controlled devices. Setup runs concurrently; a
// device that fails setup is dropped from the fleet and reported once.

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{info, warn};

use crate::config::DeviceConfig;
use crate::controller::DeviceController;
use crate::error::CoreError;

/// A device that did not make it through setup.
#[derive(Debug, Clone)]
pub struct SetupFailure {
    pub address: String,
    pub error: Option<CoreError>,
}

#[derive(Debug, Default)]
pub struct Fleet {
    devices: Vec<DeviceController>,
    failures: Vec<SetupFailure>,
}

impl Fleet {
    /// Build and set up a controller per configured address.
    ///
    /// Duplicate addresses are collapsed to the first occurrence. Surviving
    /// devices keep their configuration order.
    pub async fn setup(configs: impl IntoIterator<Item = DeviceConfig>) -> Self {
        let mut seen = HashSet::new();
        let mut failures = Vec::new();

        let mut controllers = Vec::new();
        for config in configs {
            if !seen.insert(config.address.clone()) {
                warn!(address = %config.address, "duplicate device address ignored");
                continue;
            }
            let address = config.address.clone();
            match DeviceController::new(config) {
                Ok(controller) => controllers.push(controller),
                Err(e) => {
                    warn!(%address, error = %e, "cannot create device controller");
                    failures.push(SetupFailure {
                        address,
                        error: Some(e),
                    });
                }
            }
        }

        let results = join_all(controllers.iter().map(DeviceController::setup)).await;

        let mut devices = Vec::with_capacity(controllers.len());
        for (controller, ok) in controllers.into_iter().zip(results) {
            if ok {
                devices.push(controller);
            } else {
                warn!(address = %controller.address(), "device setup failed, discarding");
                failures.push(SetupFailure {
                    address: controller.address().to_owned(),
                    error: controller.last_error(),
                });
            }
        }

        info!(
            ready = devices.len(),
            failed = failures.len(),
            "fleet setup complete"
        );
        Self { devices, failures }
    }

    pub fn devices(&self) -> &[DeviceController] {
        &self.devices
    }

    pub fn failures(&self) -> &[SetupFailure] {
        &self.failures
    }

    /// Look up a device by address or id.
    pub fn get(&self, identifier: &str) -> Option<&DeviceController> {
        self.devices
            .iter()
            .find(|d| d.address() == identifier || d.id().to_string() == identifier)
    }

    pub fn require(&self, identifier: &str) -> Result<&DeviceController, CoreError> {
        self.get(identifier)
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: identifier.to_owned(),
            })
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
