// ── Device controller ──
//
// One controller per adapter address. Owns the device's `Status`, funnels
// every network exchange through a single per-device lock, debounces
// refreshes, and runs optimistic writes with rollback.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

use daikin_api::DaikinClient;

use crate::config::DeviceConfig;
use crate::error::CoreError;
use crate::model::{
    Active, CurrentHeaterCoolerState, DeviceInfo, FanDirection, FanSpeed, Mode, Status, SwingMode,
    TargetHeaterCoolerState,
};

pub const MIN_COOLING_TEMPERATURE: f64 = 18.0;
pub const MAX_COOLING_TEMPERATURE: f64 = 32.0;
pub const MIN_HEATING_TEMPERATURE: f64 = 10.0;
pub const MAX_HEATING_TEMPERATURE: f64 = 30.0;
pub const MAX_ROTATION_SPEED: u8 = 6;

/// Fan speeds addressed by rotation steps `1..=MAX_ROTATION_SPEED`.
const ROTATION_SPEEDS: [FanSpeed; 6] = [
    FanSpeed::Night,
    FanSpeed::S1,
    FanSpeed::S2,
    FanSpeed::S3,
    FanSpeed::S4,
    FanSpeed::S5,
];

/// Stable identity for an adapter address.
pub fn device_id(address: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, address.as_bytes())
}

// ── DeviceState ──────────────────────────────────────────────────

/// Lifecycle state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Unconfigured,
    Ready,
    Refreshing,
    Saving,
    /// Setup failed. Terminal; the device should be discarded.
    Failed,
}

/// Result of an optimistic write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Requested value was already current; nothing was sent.
    Unchanged,
    Saved,
    /// The device refused or was unreachable; the previous value is restored.
    RolledBack,
}

impl WriteOutcome {
    pub fn is_success(self) -> bool {
        !matches!(self, Self::RolledBack)
    }
}

// ── DeviceController ─────────────────────────────────────────────

/// Mediates all reads and writes for one adapter.
///
/// Cheaply cloneable via `Arc<DeviceInner>`. Callers only ever receive
/// cloned snapshots or scalar property values; the live `Status` never
/// leaves the controller.
#[derive(Clone)]
pub struct DeviceController {
    inner: Arc<DeviceInner>,
}

struct DeviceInner {
    config: DeviceConfig,
    id: Uuid,
    client: DaikinClient,
    /// Network lock. Guards the instant of the last refresh attempt.
    exchange: Mutex<Option<Instant>>,
    /// Serializes set/save/rollback sequences.
    writes: Mutex<()>,
    status: watch::Sender<Status>,
    info: watch::Sender<DeviceInfo>,
    state: watch::Sender<DeviceState>,
    running_state: watch::Sender<CurrentHeaterCoolerState>,
    last_error: watch::Sender<Option<CoreError>>,
}

impl fmt::Debug for DeviceController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceController")
            .field("address", &self.inner.config.address)
            .field("id", &self.inner.id)
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl DeviceController {
    /// Create a controller for `config.address`. Does NOT contact the
    /// device; call [`setup()`](Self::setup) for the first fetch.
    pub fn new(config: DeviceConfig) -> Result<Self, CoreError> {
        let client = DaikinClient::for_address(&config.address, &config.transport())?;
        Ok(Self::with_client(config, client))
    }

    /// Create a controller around a pre-built client.
    pub fn with_client(config: DeviceConfig, client: DaikinClient) -> Self {
        let id = device_id(&config.address);
        let (status, _) = watch::channel(Status::default());
        let (info, _) = watch::channel(DeviceInfo::default());
        let (state, _) = watch::channel(DeviceState::Unconfigured);
        let (running_state, _) = watch::channel(CurrentHeaterCoolerState::default());
        let (last_error, _) = watch::channel(None);

        Self {
            inner: Arc::new(DeviceInner {
                config,
                id,
                client,
                exchange: Mutex::new(None),
                writes: Mutex::new(()),
                status,
                info,
                state,
                running_state,
                last_error,
            }),
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.inner.config
    }

    pub fn address(&self) -> &str {
        &self.inner.config.address
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Snapshot of the current status.
    pub fn status(&self) -> Status {
        self.inner.status.borrow().clone()
    }

    pub fn info(&self) -> DeviceInfo {
        self.inner.info.borrow().clone()
    }

    pub fn state(&self) -> DeviceState {
        *self.inner.state.borrow()
    }

    /// The most recent exchange error, cleared by the next success.
    pub fn last_error(&self) -> Option<CoreError> {
        self.inner.last_error.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<Status> {
        self.inner.status.subscribe()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<DeviceState> {
        self.inner.state.subscribe()
    }

    /// Derived running state, republished after every refresh and write.
    pub fn subscribe_running_state(&self) -> watch::Receiver<CurrentHeaterCoolerState> {
        self.inner.running_state.subscribe()
    }

    // ── Network operations ───────────────────────────────────────

    /// Probe the adapter (if enabled) and perform the first refresh.
    ///
    /// Never errors; any failure leaves the controller in
    /// [`DeviceState::Failed`] and returns `false`.
    pub async fn setup(&self) -> bool {
        if self.inner.config.probe_basic_info && !self.probe().await {
            self.inner.state.send_replace(DeviceState::Failed);
            return false;
        }

        let ok = self.get_control_info().await;
        if ok {
            self.inner.state.send_replace(DeviceState::Ready);
            info!(address = %self.address(), name = %self.inner.info.borrow().name, "device ready");
        } else {
            self.inner.state.send_replace(DeviceState::Failed);
        }
        ok
    }

    async fn probe(&self) -> bool {
        let _exchange = self.inner.exchange.lock().await;
        debug!(address = %self.address(), "getting device info");

        match self.inner.client.basic_info().await {
            Ok(basic) if basic.is_aircon() => {
                self.inner.info.send_replace(DeviceInfo::from(&basic));
                true
            }
            Ok(basic) => {
                self.record_error(CoreError::UnsupportedDevice {
                    address: self.address().to_owned(),
                    kind: basic.kind.unwrap_or_default(),
                });
                false
            }
            Err(e) => {
                self.record_error(e.into());
                false
            }
        }
    }

    /// Refresh the status from the device.
    ///
    /// Calls closer together than the debounce window are answered from
    /// cache with the result of the previous refresh. The refresh instant
    /// advances on failure too, so an unreachable device is not hammered.
    pub async fn get_control_info(&self) -> bool {
        let mut last_refresh = self.inner.exchange.lock().await;

        if let Some(at) = *last_refresh {
            if at.elapsed() < self.inner.config.debounce {
                trace!(address = %self.address(), "refresh debounced");
                return self.inner.status.borrow().was_success_update();
            }
        }

        debug!(address = %self.address(), "getting device control info");
        self.transition(DeviceState::Ready, DeviceState::Refreshing);

        let (control, sensor) = tokio::join!(
            self.inner.client.control_info(),
            self.inner.client.sensor_info(),
        );

        *last_refresh = Some(Instant::now());
        self.transition(DeviceState::Refreshing, DeviceState::Ready);

        match (control, sensor) {
            (Ok(control), Ok(sensor)) => {
                self.inner
                    .status
                    .send_modify(|status| status.update(&control, &sensor));
                self.inner.last_error.send_replace(None);
                self.publish_running_state();
                true
            }
            (Err(e), _) | (_, Err(e)) => {
                self.inner.status.send_modify(Status::reject_update);
                self.record_error(e.into());
                false
            }
        }
    }

    /// Push the current status to the device.
    ///
    /// Never mutates the status; rolling back is the caller's decision
    /// (see the `apply_*` helpers).
    pub async fn save_control_info(&self) -> bool {
        let _exchange = self.inner.exchange.lock().await;

        let params = self.inner.status.borrow().to_params();
        debug!(address = %self.address(), params = %params.to_query(), "saving device control info");
        self.transition(DeviceState::Ready, DeviceState::Saving);

        let result = self.inner.client.set_control_info(&params).await;
        self.transition(DeviceState::Saving, DeviceState::Ready);

        match result {
            Ok(()) => {
                self.inner.last_error.send_replace(None);
                true
            }
            Err(e) => {
                self.record_error(e.into());
                false
            }
        }
    }

    fn record_error(&self, err: CoreError) {
        error!(address = %self.address(), error = %err, "device exchange failed");
        self.inner.last_error.send_replace(Some(err));
    }

    fn transition(&self, from: DeviceState, to: DeviceState) {
        self.inner.state.send_if_modified(|state| {
            if *state == from {
                *state = to;
                true
            } else {
                false
            }
        });
    }

    fn publish_running_state(&self) {
        self.inner
            .running_state
            .send_replace(self.current_heater_cooler_state());
    }

    // ── Typed properties ─────────────────────────────────────────
    //
    // These act on the cached status only and never take the network lock.

    pub fn active(&self) -> Active {
        Active::from(self.inner.status.borrow().power)
    }

    pub fn set_active(&self, value: Active) {
        self.inner
            .status
            .send_modify(|status| status.power = value.is_active());
    }

    pub fn target_heater_cooler_state(&self) -> TargetHeaterCoolerState {
        match self.inner.status.borrow().mode {
            Mode::Cool => TargetHeaterCoolerState::Cool,
            Mode::Heat => TargetHeaterCoolerState::Heat,
            _ => TargetHeaterCoolerState::Auto,
        }
    }

    pub fn set_target_heater_cooler_state(&self, value: TargetHeaterCoolerState) {
        self.inner
            .status
            .send_modify(|status| status.mode = mode_for(value));
    }

    pub fn current_heater_cooler_state(&self) -> CurrentHeaterCoolerState {
        let status = self.inner.status.borrow();
        if !status.power {
            return CurrentHeaterCoolerState::Inactive;
        }
        match status.mode {
            Mode::Heat => CurrentHeaterCoolerState::Heating,
            Mode::Cool => CurrentHeaterCoolerState::Cooling,
            _ => CurrentHeaterCoolerState::Idle,
        }
    }

    pub fn cooling_threshold_temperature(&self) -> f64 {
        self.inner.status.borrow().cool_target_temperature
    }

    /// Clamped to `18..=32` °C.
    pub fn set_cooling_threshold_temperature(&self, value: f64) {
        let temperature = cooling_threshold_for(value);
        self.inner
            .status
            .send_modify(|status| status.cool_target_temperature = temperature);
    }

    pub fn heating_threshold_temperature(&self) -> f64 {
        self.inner.status.borrow().heat_target_temperature
    }

    /// Clamped to `10..=30` °C.
    pub fn set_heating_threshold_temperature(&self, value: f64) {
        let temperature = heating_threshold_for(value);
        self.inner
            .status
            .send_modify(|status| status.heat_target_temperature = temperature);
    }

    /// Room temperature from the last refresh.
    pub fn current_temperature(&self) -> f64 {
        self.inner.status.borrow().room_temperature
    }

    /// Rotation step `1..=6`; Auto and Night both read as 1.
    pub fn rotation_speed(&self) -> u8 {
        let speed = self.inner.status.borrow().fan_speed;
        (1..=MAX_ROTATION_SPEED)
            .zip(ROTATION_SPEEDS)
            .find(|(_, candidate)| *candidate == speed)
            .map_or(1, |(step, _)| step)
    }

    /// Steps `1..=6` select Night, S1..S5; anything else selects Auto.
    pub fn set_rotation_speed(&self, value: u8) {
        let speed = fan_speed_for(value);
        self.inner.status.send_modify(|status| status.fan_speed = speed);
    }

    pub fn swing_mode(&self) -> SwingMode {
        if is_swinging(self.inner.status.borrow().fan_direction) {
            SwingMode::Enabled
        } else {
            SwingMode::Disabled
        }
    }

    /// Enabling keeps a direction that already swings; otherwise Vertical.
    pub fn set_swing_mode(&self, value: SwingMode) {
        self.inner.status.send_modify(|status| {
            status.fan_direction = fan_direction_for(status.fan_direction, value);
        });
    }

    // ── Optimistic writes ────────────────────────────────────────

    pub async fn apply_active(&self, value: Active) -> WriteOutcome {
        self.apply(
            "active",
            |_| value.is_active(),
            |status| status.power,
            |status, power| status.power = power,
        )
        .await
    }

    pub async fn apply_target_heater_cooler_state(
        &self,
        value: TargetHeaterCoolerState,
    ) -> WriteOutcome {
        self.apply(
            "target_heater_cooler_state",
            |_| mode_for(value),
            |status| status.mode,
            |status, mode| status.mode = mode,
        )
        .await
    }

    pub async fn apply_cooling_threshold_temperature(&self, value: f64) -> WriteOutcome {
        self.apply(
            "cooling_threshold_temperature",
            |_| cooling_threshold_for(value),
            |status| status.cool_target_temperature,
            |status, temperature| status.cool_target_temperature = temperature,
        )
        .await
    }

    pub async fn apply_heating_threshold_temperature(&self, value: f64) -> WriteOutcome {
        self.apply(
            "heating_threshold_temperature",
            |_| heating_threshold_for(value),
            |status| status.heat_target_temperature,
            |status, temperature| status.heat_target_temperature = temperature,
        )
        .await
    }

    pub async fn apply_rotation_speed(&self, value: u8) -> WriteOutcome {
        self.apply(
            "rotation_speed",
            |_| fan_speed_for(value),
            |status| status.fan_speed,
            |status, speed| status.fan_speed = speed,
        )
        .await
    }

    pub async fn apply_swing_mode(&self, value: SwingMode) -> WriteOutcome {
        self.apply(
            "swing_mode",
            |status| fan_direction_for(status.fan_direction, value),
            |status| status.fan_direction,
            |status, direction| status.fan_direction = direction,
        )
        .await
    }

    /// Set one status field, save, and put the stored field back if the
    /// save fails. `resolve` maps the requested property value onto the
    /// field; equal field values are a no-op. The whole sequence holds the
    /// per-device write lock.
    async fn apply<F>(
        &self,
        property: &'static str,
        resolve: impl FnOnce(&Status) -> F,
        read: fn(&Status) -> F,
        write: fn(&mut Status, F),
    ) -> WriteOutcome
    where
        F: Copy + PartialEq + fmt::Debug,
    {
        let _write = self.inner.writes.lock().await;
        let (previous, value) = {
            let status = self.inner.status.borrow();
            (read(&status), resolve(&status))
        };

        let outcome = if previous == value {
            tokio::time::sleep(self.inner.config.noop_delay).await;
            WriteOutcome::Unchanged
        } else {
            self.inner.status.send_modify(|status| write(status, value));
            if self.save_control_info().await {
                debug!(address = %self.address(), property, ?value, "property saved");
                WriteOutcome::Saved
            } else {
                warn!(
                    address = %self.address(),
                    property,
                    ?value,
                    ?previous,
                    "save failed, rolling back"
                );
                self.inner.status.send_modify(|status| write(status, previous));
                WriteOutcome::RolledBack
            }
        };

        self.publish_running_state();
        outcome
    }
}

fn mode_for(value: TargetHeaterCoolerState) -> Mode {
    match value {
        TargetHeaterCoolerState::Cool => Mode::Cool,
        TargetHeaterCoolerState::Heat => Mode::Heat,
        TargetHeaterCoolerState::Auto => Mode::Auto,
    }
}

fn cooling_threshold_for(value: f64) -> f64 {
    clamp_temperature(value, MIN_COOLING_TEMPERATURE, MAX_COOLING_TEMPERATURE)
}

fn heating_threshold_for(value: f64) -> f64 {
    clamp_temperature(value, MIN_HEATING_TEMPERATURE, MAX_HEATING_TEMPERATURE)
}

fn fan_speed_for(step: u8) -> FanSpeed {
    step.checked_sub(1)
        .and_then(|index| ROTATION_SPEEDS.get(usize::from(index)))
        .copied()
        .unwrap_or(FanSpeed::Auto)
}

fn fan_direction_for(current: FanDirection, value: SwingMode) -> FanDirection {
    match value {
        SwingMode::Enabled if is_swinging(current) => current,
        SwingMode::Enabled => FanDirection::Vertical,
        SwingMode::Disabled => FanDirection::Off,
    }
}

fn is_swinging(direction: FanDirection) -> bool {
    matches!(
        direction,
        FanDirection::Vertical | FanDirection::Horizontal | FanDirection::Both
    )
}

fn clamp_temperature(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
