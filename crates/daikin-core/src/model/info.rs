// ── Adapter identity ──

use serde::{Deserialize, Serialize};

use daikin_api::BasicInfo;

pub const DEFAULT_NAME: &str = "DaikinAC";
pub const UNKNOWN_MAC: &str = "UNKNOWN";

/// Name and hardware address reported by the adapter's basic-info probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: String,
    pub mac: String,
    pub kind: Option<String>,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.into(),
            mac: UNKNOWN_MAC.into(),
            kind: None,
        }
    }
}

impl From<&BasicInfo> for DeviceInfo {
    fn from(info: &BasicInfo) -> Self {
        Self {
            name: info.decoded_name().unwrap_or_else(|| DEFAULT_NAME.into()),
            mac: info.formatted_mac().unwrap_or_else(|| UNKNOWN_MAC.into()),
            kind: info.kind.clone(),
        }
    }
}
