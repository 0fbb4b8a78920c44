#![allow(clippy::unwrap_used)]
// Integration tests for `DeviceController` and `Fleet` against a mocked adapter.

use std::time::Duration;

use tokio::time::Instant;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use daikin_core::{
    Active, CoreError, CurrentHeaterCoolerState, DeviceConfig, DeviceController, DeviceState,
    FanDirection, FanSpeed, Fleet, Mode, SwingMode, TargetHeaterCoolerState, WriteOutcome,
};

const BASIC_INFO: &str = "ret=OK,type=aircon,reg=eu,dst=1,ver=1_2_54,pow=1,err=0,location=0,\
                          name=%4c%69%76%69%6e%67,icon=0,method=home only,port=30050,\
                          mac=A0B1C2D3E4F5,adp_mode=run";
const CONTROL_INFO: &str = "ret=OK,pow=1,mode=3,adv=,stemp=24.0,shum=0,dt1=24.0,dt2=M,\
                            dt3=24.0,dt4=21.0,dt5=21.0,dt7=24.0,f_rate=A,f_dir=0";
const CONTROL_INFO_OFF: &str = "ret=OK,pow=0,mode=3,adv=,stemp=24.0,shum=0,dt3=24.0,dt4=21.0,\
                                f_rate=A,f_dir=0";
const CONTROL_INFO_DRY: &str = "ret=OK,pow=1,mode=2,adv=,stemp=M,shum=AUTO,dt3=18.0,dt4=21.0,\
                                f_rate=A,f_dir=2";
const SENSOR_INFO: &str = "ret=OK,htemp=23.5,hhum=-,otemp=12.0,err=0,cmpfreq=0";

// ── Helpers ─────────────────────────────────────────────────────────

fn ok(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(body)
}

async fn mount(server: &MockServer, endpoint: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_device(server: &MockServer, control: &str) {
    mount(server, "/common/basic_info", ok(BASIC_INFO)).await;
    mount(server, "/aircon/get_control_info", ok(control)).await;
    mount(server, "/aircon/get_sensor_info", ok(SENSOR_INFO)).await;
}

fn config(server: &MockServer, debounce: Duration) -> DeviceConfig {
    DeviceConfig {
        debounce,
        ..DeviceConfig::new(server.address().to_string())
    }
}

fn closed_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    address.to_string()
}

// ── Setup ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_setup_populates_status_and_info() {
    let server = MockServer::start().await;
    mount_device(&server, CONTROL_INFO).await;

    let ctrl = DeviceController::new(config(&server, Duration::ZERO)).unwrap();
    assert!(ctrl.setup().await);

    assert_eq!(ctrl.state(), DeviceState::Ready);
    assert_eq!(ctrl.info().name, "Living");
    assert_eq!(ctrl.info().mac, "A0:B1:C2:D3:E4:F5");

    let status = ctrl.status();
    assert!(status.power);
    assert_eq!(status.mode, Mode::Cool);
    assert_eq!(status.fan_speed, FanSpeed::Auto);
    assert_eq!(status.cool_target_temperature, 24.0);
    assert_eq!(status.heat_target_temperature, 21.0);
    assert_eq!(status.room_temperature, 23.5);
    assert!(status.was_success_update());

    assert_eq!(ctrl.active(), Active::Active);
    assert_eq!(
        ctrl.target_heater_cooler_state(),
        TargetHeaterCoolerState::Cool
    );
    assert_eq!(ctrl.swing_mode(), SwingMode::Disabled);
    assert_eq!(ctrl.current_temperature(), 23.5);
    assert_eq!(
        *ctrl.subscribe_running_state().borrow(),
        CurrentHeaterCoolerState::Cooling
    );
}

#[tokio::test]
async fn test_setup_rejects_non_aircon_adapter() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/common/basic_info",
        ok("ret=OK,type=heatpump,name=%54%61%6e%6b"),
    )
    .await;

    let ctrl = DeviceController::new(config(&server, Duration::ZERO)).unwrap();
    assert!(!ctrl.setup().await);

    assert_eq!(ctrl.state(), DeviceState::Failed);
    assert!(
        matches!(ctrl.last_error(), Some(CoreError::UnsupportedDevice { ref kind, .. }) if kind == "heatpump"),
        "got: {:?}",
        ctrl.last_error()
    );
}

#[tokio::test]
async fn test_setup_without_probe_skips_basic_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/common/basic_info"))
        .respond_with(ok(BASIC_INFO))
        .expect(0)
        .mount(&server)
        .await;
    mount(&server, "/aircon/get_control_info", ok(CONTROL_INFO)).await;
    mount(&server, "/aircon/get_sensor_info", ok(SENSOR_INFO)).await;

    let ctrl = DeviceController::new(DeviceConfig {
        probe_basic_info: false,
        ..config(&server, Duration::ZERO)
    })
    .unwrap();

    assert!(ctrl.setup().await);
    assert_eq!(ctrl.info().name, "DaikinAC");
}

#[tokio::test]
async fn test_setup_unreachable_device_fails() {
    let ctrl = DeviceController::new(DeviceConfig {
        timeout: Duration::from_secs(2),
        ..DeviceConfig::new(closed_address())
    })
    .unwrap();

    assert!(!ctrl.setup().await);
    assert_eq!(ctrl.state(), DeviceState::Failed);
    assert!(ctrl.last_error().unwrap().is_unreachable());
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_is_debounced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/aircon/get_control_info"))
        .respond_with(ok(CONTROL_INFO))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/aircon/get_sensor_info"))
        .respond_with(ok(SENSOR_INFO))
        .expect(1)
        .mount(&server)
        .await;

    let ctrl = DeviceController::new(config(&server, Duration::from_secs(60))).unwrap();

    assert!(ctrl.get_control_info().await);
    assert!(ctrl.get_control_info().await);

    let (a, b) = tokio::join!(ctrl.get_control_info(), ctrl.get_control_info());
    assert!(a && b);
}

#[tokio::test]
async fn test_debounced_refresh_repeats_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/aircon/get_control_info"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount(&server, "/aircon/get_sensor_info", ok(SENSOR_INFO)).await;

    let ctrl = DeviceController::new(config(&server, Duration::from_secs(60))).unwrap();

    assert!(!ctrl.get_control_info().await);
    assert!(!ctrl.get_control_info().await);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_values() {
    let server = MockServer::start().await;
    mount_device(&server, CONTROL_INFO).await;

    let ctrl = DeviceController::new(config(&server, Duration::ZERO)).unwrap();
    assert!(ctrl.setup().await);
    let before = ctrl.status();

    server.reset().await;
    mount(&server, "/aircon/get_control_info", ok("ret=NG,pow=0")).await;
    mount(&server, "/aircon/get_sensor_info", ok(SENSOR_INFO)).await;

    assert!(!ctrl.get_control_info().await);

    let after = ctrl.status();
    assert!(!after.was_success_update());
    assert_eq!(after.power, before.power);
    assert_eq!(after.mode, before.mode);
    assert_eq!(after.cool_target_temperature, before.cool_target_temperature);
    assert_eq!(after.room_temperature, before.room_temperature);
    assert!(matches!(ctrl.last_error(), Some(CoreError::Rejected { .. })));
}

#[tokio::test]
async fn test_refresh_and_save_do_not_overlap() {
    let server = MockServer::start().await;
    let delay = Duration::from_millis(200);
    mount(&server, "/common/basic_info", ok(BASIC_INFO)).await;
    mount(
        &server,
        "/aircon/get_control_info",
        ok(CONTROL_INFO).set_delay(delay),
    )
    .await;
    mount(
        &server,
        "/aircon/get_sensor_info",
        ok(SENSOR_INFO).set_delay(delay),
    )
    .await;
    mount(
        &server,
        "/aircon/set_control_info",
        ok("ret=OK,adv=").set_delay(delay),
    )
    .await;

    let ctrl = DeviceController::new(config(&server, Duration::ZERO)).unwrap();
    assert!(ctrl.setup().await);

    let start = Instant::now();
    let (refreshed, saved) = tokio::join!(ctrl.get_control_info(), ctrl.save_control_info());
    let elapsed = start.elapsed();

    assert!(refreshed && saved);
    assert!(
        elapsed >= delay * 2,
        "refresh and save overlapped: {elapsed:?}"
    );

    let requests = server.received_requests().await.unwrap();
    let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
    let (last, refresh) = paths.split_last().unwrap();
    assert_eq!(*last, "/aircon/set_control_info", "{paths:?}");
    let mut refresh = refresh[refresh.len() - 2..].to_vec();
    refresh.sort_unstable();
    assert_eq!(
        refresh,
        ["/aircon/get_control_info", "/aircon/get_sensor_info"],
        "{paths:?}"
    );
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_apply_active_saves_full_state() {
    let server = MockServer::start().await;
    mount_device(&server, CONTROL_INFO_OFF).await;
    Mock::given(method("GET"))
        .and(path("/aircon/set_control_info"))
        .and(query_param("pow", "1"))
        .and(query_param("mode", "3"))
        .and(query_param("stemp", "24.0"))
        .and(query_param("f_rate", "A"))
        .and(query_param("f_dir", "0"))
        .respond_with(ok("ret=OK,adv="))
        .expect(1)
        .mount(&server)
        .await;

    let ctrl = DeviceController::new(config(&server, Duration::ZERO)).unwrap();
    assert!(ctrl.setup().await);
    let mut running = ctrl.subscribe_running_state();
    assert_eq!(*running.borrow_and_update(), CurrentHeaterCoolerState::Inactive);

    assert_eq!(ctrl.apply_active(Active::Active).await, WriteOutcome::Saved);

    assert_eq!(ctrl.active(), Active::Active);
    assert!(running.has_changed().unwrap());
    assert_eq!(*running.borrow(), CurrentHeaterCoolerState::Cooling);
}

#[tokio::test]
async fn test_failed_save_rolls_back() {
    let server = MockServer::start().await;
    mount_device(&server, CONTROL_INFO_OFF).await;
    mount(&server, "/aircon/set_control_info", ok("ret=PARAM NG,adv=")).await;

    let ctrl = DeviceController::new(config(&server, Duration::ZERO)).unwrap();
    assert!(ctrl.setup().await);

    assert_eq!(
        ctrl.apply_active(Active::Active).await,
        WriteOutcome::RolledBack
    );
    assert_eq!(ctrl.active(), Active::Inactive);

    assert_eq!(
        ctrl.apply_cooling_threshold_temperature(26.0).await,
        WriteOutcome::RolledBack
    );
    assert_eq!(ctrl.cooling_threshold_temperature(), 24.0);
    assert_eq!(ctrl.state(), DeviceState::Ready);
    assert!(matches!(ctrl.last_error(), Some(CoreError::Rejected { .. })));
}

#[tokio::test]
async fn test_rollback_restores_stored_fields() {
    let server = MockServer::start().await;
    mount_device(&server, CONTROL_INFO_DRY).await;
    mount(&server, "/aircon/set_control_info", ok("ret=PARAM NG,adv=")).await;

    let ctrl = DeviceController::new(config(&server, Duration::ZERO)).unwrap();
    assert!(ctrl.setup().await);

    assert_eq!(ctrl.apply_rotation_speed(4).await, WriteOutcome::RolledBack);
    assert_eq!(ctrl.status().fan_speed, FanSpeed::Auto);

    assert_eq!(
        ctrl.apply_swing_mode(SwingMode::Disabled).await,
        WriteOutcome::RolledBack
    );
    assert_eq!(ctrl.status().fan_direction, FanDirection::Horizontal);

    assert_eq!(
        ctrl.apply_target_heater_cooler_state(TargetHeaterCoolerState::Heat)
            .await,
        WriteOutcome::RolledBack
    );
    assert_eq!(ctrl.status().mode, Mode::Dry);
}

#[tokio::test]
async fn test_night_speed_selectable_from_auto() {
    let server = MockServer::start().await;
    mount_device(&server, CONTROL_INFO).await;
    Mock::given(method("GET"))
        .and(path("/aircon/set_control_info"))
        .and(query_param("f_rate", "B"))
        .respond_with(ok("ret=OK"))
        .expect(1)
        .mount(&server)
        .await;

    let ctrl = DeviceController::new(config(&server, Duration::ZERO)).unwrap();
    assert!(ctrl.setup().await);
    assert_eq!(ctrl.rotation_speed(), 1);

    assert_eq!(ctrl.apply_rotation_speed(1).await, WriteOutcome::Saved);
    assert_eq!(ctrl.status().fan_speed, FanSpeed::Night);
}

#[tokio::test]
async fn test_clamped_or_equivalent_value_is_not_sent() {
    let server = MockServer::start().await;
    mount_device(&server, CONTROL_INFO_DRY).await;
    Mock::given(method("GET"))
        .and(path("/aircon/set_control_info"))
        .respond_with(ok("ret=OK"))
        .expect(0)
        .mount(&server)
        .await;

    let ctrl = DeviceController::new(config(&server, Duration::ZERO)).unwrap();
    assert!(ctrl.setup().await);

    assert_eq!(
        ctrl.apply_cooling_threshold_temperature(10.0).await,
        WriteOutcome::Unchanged
    );
    assert_eq!(
        ctrl.apply_swing_mode(SwingMode::Enabled).await,
        WriteOutcome::Unchanged
    );
    assert_eq!(ctrl.status().fan_direction, FanDirection::Horizontal);
}

#[tokio::test]
async fn test_unchanged_value_is_not_sent() {
    let server = MockServer::start().await;
    mount_device(&server, CONTROL_INFO_OFF).await;
    Mock::given(method("GET"))
        .and(path("/aircon/set_control_info"))
        .respond_with(ok("ret=OK"))
        .expect(0)
        .mount(&server)
        .await;

    let ctrl = DeviceController::new(config(&server, Duration::ZERO)).unwrap();
    assert!(ctrl.setup().await);

    assert_eq!(
        ctrl.apply_active(Active::Inactive).await,
        WriteOutcome::Unchanged
    );
    assert_eq!(
        ctrl.apply_swing_mode(SwingMode::Disabled).await,
        WriteOutcome::Unchanged
    );
}

#[tokio::test]
async fn test_heating_threshold_is_sent_as_target_in_heat_mode() {
    let server = MockServer::start().await;
    mount_device(&server, CONTROL_INFO).await;
    Mock::given(method("GET"))
        .and(path("/aircon/set_control_info"))
        .and(query_param("mode", "4"))
        .and(query_param("stemp", "21.0"))
        .respond_with(ok("ret=OK"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/aircon/set_control_info"))
        .and(query_param("mode", "4"))
        .and(query_param("stemp", "30.0"))
        .respond_with(ok("ret=OK"))
        .expect(1)
        .mount(&server)
        .await;

    let ctrl = DeviceController::new(config(&server, Duration::ZERO)).unwrap();
    assert!(ctrl.setup().await);

    assert_eq!(
        ctrl.apply_target_heater_cooler_state(TargetHeaterCoolerState::Heat)
            .await,
        WriteOutcome::Saved
    );
    assert_eq!(
        ctrl.apply_heating_threshold_temperature(35.0).await,
        WriteOutcome::Saved
    );
    assert_eq!(ctrl.heating_threshold_temperature(), 30.0);
    assert_eq!(
        ctrl.current_heater_cooler_state(),
        CurrentHeaterCoolerState::Heating
    );
}

#[tokio::test]
async fn test_rotation_speed_write() {
    let server = MockServer::start().await;
    mount_device(&server, CONTROL_INFO).await;
    Mock::given(method("GET"))
        .and(path("/aircon/set_control_info"))
        .and(query_param("f_rate", "5"))
        .respond_with(ok("ret=OK"))
        .expect(1)
        .mount(&server)
        .await;

    let ctrl = DeviceController::new(config(&server, Duration::ZERO)).unwrap();
    assert!(ctrl.setup().await);

    assert_eq!(ctrl.apply_rotation_speed(4).await, WriteOutcome::Saved);
    assert_eq!(ctrl.status().fan_speed, FanSpeed::S3);
    assert_eq!(ctrl.rotation_speed(), 4);
}

// ── Fleet ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fleet_dedupes_and_discards_failures() {
    let server = MockServer::start().await;
    mount_device(&server, CONTROL_INFO).await;

    let good = config(&server, Duration::ZERO);
    let dead = DeviceConfig {
        timeout: Duration::from_secs(2),
        ..DeviceConfig::new(closed_address())
    };

    let fleet = Fleet::setup([good.clone(), dead.clone(), good.clone()]).await;

    assert_eq!(fleet.len(), 1);
    assert_eq!(fleet.failures().len(), 1);
    assert_eq!(fleet.failures()[0].address, dead.address);

    let device = fleet.get(&good.address).unwrap();
    assert_eq!(device.state(), DeviceState::Ready);
    assert!(fleet.get(&device.id().to_string()).is_some());
    assert!(matches!(
        fleet.require("10.0.0.99"),
        Err(CoreError::DeviceNotFound { .. })
    ));
}
