// ── Heater/cooler characteristic values ──
//
// The numeric values match the HomeKit heater-cooler service, which is
// what bridge integrations hand to and expect from the controller.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Active {
    #[strum(to_string = "inactive", serialize = "off")]
    Inactive = 0,
    #[strum(to_string = "active", serialize = "on")]
    Active = 1,
}

impl Active {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

impl From<bool> for Active {
    fn from(on: bool) -> Self {
        if on { Self::Active } else { Self::Inactive }
    }
}

/// Requested operating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TargetHeaterCoolerState {
    Auto = 0,
    Heat = 1,
    Cool = 2,
}

/// What the unit is doing right now. Read-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CurrentHeaterCoolerState {
    #[default]
    Inactive = 0,
    Idle = 1,
    Heating = 2,
    Cooling = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SwingMode {
    #[strum(to_string = "disabled", serialize = "off")]
    Disabled = 0,
    #[strum(to_string = "enabled", serialize = "on")]
    Enabled = 1,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_on_off_aliases() {
        assert_eq!("on".parse::<Active>().unwrap(), Active::Active);
        assert_eq!("OFF".parse::<Active>().unwrap(), Active::Inactive);
        assert_eq!("on".parse::<SwingMode>().unwrap(), SwingMode::Enabled);
        assert_eq!("Disabled".parse::<SwingMode>().unwrap(), SwingMode::Disabled);
    }

    #[test]
    fn target_state_parses_case_insensitively() {
        assert_eq!(
            "HEAT".parse::<TargetHeaterCoolerState>().unwrap(),
            TargetHeaterCoolerState::Heat
        );
        assert!("dry".parse::<TargetHeaterCoolerState>().is_err());
    }

    #[test]
    fn active_from_power_flag() {
        assert_eq!(Active::from(true), Active::Active);
        assert!(!Active::from(false).is_active());
    }
}
