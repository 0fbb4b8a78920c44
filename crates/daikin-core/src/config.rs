// ── Runtime device configuration ──
//
// Describes *how* to talk to one adapter. Never touches disk; the CLI or
// another host builds a `DeviceConfig` and hands it in.

use std::time::Duration;

use daikin_api::TransportConfig;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);
pub const DEFAULT_NOOP_DELAY: Duration = Duration::from_millis(10);

/// Configuration for one adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Host or `host:port` of the adapter.
    pub address: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Refreshes closer together than this are served from cache.
    pub debounce: Duration,
    /// Minimum latency of a write that turns out to be a no-op.
    pub noop_delay: Duration,
    /// Query `/common/basic_info` during setup and require `type=aircon`.
    pub probe_basic_info: bool,
}

impl DeviceConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: DEFAULT_TIMEOUT,
            debounce: DEFAULT_DEBOUNCE,
            noop_delay: DEFAULT_NOOP_DELAY,
            probe_basic_info: true,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig::with_timeout(self.timeout)
    }
}
