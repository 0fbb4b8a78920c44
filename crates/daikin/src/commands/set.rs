//! `daikin set`: optimistic writes on every selected device.

use serde::Serialize;
use tabled::Tabled;

use daikin_core::{
    Active, DeviceController, Fleet, SwingMode, TargetHeaterCoolerState, WriteOutcome,
};

use crate::cli::{GlobalOpts, ModeArg, SetArgs, SetCommand, Toggle};
use crate::error::CliError;
use crate::output;

// ── Requested change ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Change {
    Power(Active),
    Mode(TargetHeaterCoolerState),
    CoolTemp(f64),
    HeatTemp(f64),
    Fan(u8),
    Swing(SwingMode),
}

impl TryFrom<SetCommand> for Change {
    type Error = CliError;

    fn try_from(cmd: SetCommand) -> Result<Self, Self::Error> {
        let change = match cmd {
            SetCommand::Power { state } => Self::Power(match state {
                Toggle::On => Active::Active,
                Toggle::Off => Active::Inactive,
            }),
            SetCommand::Mode { mode } => Self::Mode(match mode {
                ModeArg::Auto => TargetHeaterCoolerState::Auto,
                ModeArg::Heat => TargetHeaterCoolerState::Heat,
                ModeArg::Cool => TargetHeaterCoolerState::Cool,
            }),
            SetCommand::CoolTemp { celsius } => Self::CoolTemp(finite("cool-temp", celsius)?),
            SetCommand::HeatTemp { celsius } => Self::HeatTemp(finite("heat-temp", celsius)?),
            SetCommand::Fan { step } => Self::Fan(step),
            SetCommand::Swing { state } => Self::Swing(match state {
                Toggle::On => SwingMode::Enabled,
                Toggle::Off => SwingMode::Disabled,
            }),
        };
        Ok(change)
    }
}

fn finite(field: &str, celsius: f64) -> Result<f64, CliError> {
    if celsius.is_finite() {
        Ok(celsius)
    } else {
        Err(CliError::Validation {
            field: field.into(),
            reason: format!("'{celsius}' is not a temperature"),
        })
    }
}

impl Change {
    fn property(self) -> &'static str {
        match self {
            Self::Power(_) => "power",
            Self::Mode(_) => "mode",
            Self::CoolTemp(_) => "cooling threshold",
            Self::HeatTemp(_) => "heating threshold",
            Self::Fan(_) => "fan",
            Self::Swing(_) => "swing",
        }
    }

    async fn apply(self, device: &DeviceController) -> WriteOutcome {
        match self {
            Self::Power(v) => device.apply_active(v).await,
            Self::Mode(v) => device.apply_target_heater_cooler_state(v).await,
            Self::CoolTemp(v) => device.apply_cooling_threshold_temperature(v).await,
            Self::HeatTemp(v) => device.apply_heating_threshold_temperature(v).await,
            Self::Fan(v) => device.apply_rotation_speed(v).await,
            Self::Swing(v) => device.apply_swing_mode(v).await,
        }
    }

    /// The property's value on `device` as it stands now.
    fn current(self, device: &DeviceController) -> String {
        match self {
            Self::Power(_) => device.active().to_string(),
            Self::Mode(_) => device.target_heater_cooler_state().to_string(),
            Self::CoolTemp(_) => format!("{:.1}", device.cooling_threshold_temperature()),
            Self::HeatTemp(_) => format!("{:.1}", device.heating_threshold_temperature()),
            Self::Fan(_) => device.status().fan_speed.to_string(),
            Self::Swing(_) => device.swing_mode().to_string(),
        }
    }
}

// ── Result rows ─────────────────────────────────────────────────────

#[derive(Clone, Serialize, Tabled)]
struct SetResult {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Property")]
    property: &'static str,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Outcome")]
    outcome: &'static str,
}

fn outcome_label(outcome: WriteOutcome) -> &'static str {
    match outcome {
        WriteOutcome::Saved => "saved",
        WriteOutcome::Unchanged => "unchanged",
        WriteOutcome::RolledBack => "rolled back",
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(fleet: &Fleet, args: SetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let change = Change::try_from(args.command)?;

    let mut results = Vec::with_capacity(fleet.len());
    let mut first_failure = None;

    for device in fleet.devices() {
        let outcome = change.apply(device).await;
        tracing::debug!(address = %device.address(), ?change, ?outcome, "set applied");

        if !outcome.is_success() && first_failure.is_none() {
            first_failure = Some(CliError::WriteFailed {
                address: device.address().to_owned(),
                property: change.property().into(),
                reason: device
                    .last_error()
                    .map_or_else(|| "the device refused the change".into(), |e| e.to_string()),
            });
        }

        results.push(SetResult {
            address: device.address().to_owned(),
            property: change.property(),
            value: change.current(device),
            outcome: outcome_label(outcome),
        });
    }

    let out = output::render_list(&global.output, &results, SetResult::clone, |r| {
        format!("{} {}", r.address, r.outcome)
    });
    output::print_output(&out, global.quiet);

    first_failure.map_or(Ok(()), Err)
}
