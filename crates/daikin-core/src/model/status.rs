// ── Device status snapshot ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Operating mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Auto,
    Dry,
    Cool,
    Heat,
    Fan,
    #[default]
    Unknown,
}

/// Fan rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FanSpeed {
    Auto,
    /// Quiet / night mode.
    Night,
    S1,
    S2,
    S3,
    S4,
    S5,
    #[default]
    Unknown,
}

/// Louvre swing direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FanDirection {
    Off,
    Vertical,
    Horizontal,
    Both,
    #[default]
    Unknown,
}

/// Snapshot of one device's state.
///
/// Status enforces no bounds on its own; clamping happens in
/// [`DeviceController`](crate::DeviceController) setters. Wire decoding and
/// encoding live in [`codec`](crate::codec).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub power: bool,
    pub mode: Mode,
    pub fan_speed: FanSpeed,
    pub fan_direction: FanDirection,
    pub heat_target_temperature: f64,
    pub cool_target_temperature: f64,
    pub room_temperature: f64,
    /// Set by the last decode attempt.
    #[serde(skip)]
    pub(crate) success_update: bool,
}

impl Status {
    /// Whether the last decode attempt produced a complete update.
    pub fn was_success_update(&self) -> bool {
        self.success_update
    }

    /// The set point the device is currently working towards.
    pub fn target_temperature(&self) -> f64 {
        if self.mode == Mode::Heat {
            self.heat_target_temperature
        } else {
            self.cool_target_temperature
        }
    }
}
