//! End-to-end pipeline tests over the simulated vendor cloud.

use cloudlights::presenter::{Destination, Navigator, StatusUpdate};
use cloudlights::simulator::INVALID_CREDENTIALS;
use cloudlights::{
    App, CloudConfig, ConnectionStatus, Credentials, LightDevice, Resource, SdkError,
    SimulatedCloud, Status, StatusCell, UseCase,
};
use futures_util::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

const USER: &str = "owner@example.com";
const PASSWORD: &str = "correct horse";

fn devices() -> Vec<LightDevice> {
    vec![
        LightDevice::new("AC000W0000001")
            .with_product_name("Hallway")
            .with_oem_model("SQR621U1XXW")
            .with_status(ConnectionStatus::Online),
        LightDevice::new("AC000W0000002")
            .with_product_name("Kitchen")
            .with_oem_model("SQR226U1XXW")
            .with_status(ConnectionStatus::Offline),
        LightDevice::new("AC000W0000003").with_product_name("Porch"),
    ]
}

fn cloud() -> Arc<SimulatedCloud> {
    let cloud = Arc::new(SimulatedCloud::new());
    cloud.add_account(USER, PASSWORD, devices());
    cloud
}

fn app(cloud: &Arc<SimulatedCloud>, password: &str) -> App {
    let config = CloudConfig::builder("app-id", "app-secret")
        .credentials(Credentials::new(USER, password))
        .lights_start_delay(Duration::ZERO)
        .build()
        .unwrap();
    App::with_sdk(config, cloud.clone()).unwrap()
}

#[derive(Default)]
struct RecordingNavigator(Mutex<Vec<Destination>>);

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: Destination) {
        self.0.lock().push(destination);
    }
}

async fn wait_for_terminal(cell: &StatusCell) -> StatusUpdate {
    let mut updates = Box::pin(cell.updates());
    while let Some(update) = updates.next().await {
        if update.status != Status::Loading {
            return update;
        }
    }
    panic!("status cell closed without a terminal status");
}

#[tokio::test]
async fn happy_path_login() {
    let cloud = cloud();
    let app = app(&cloud, PASSWORD);

    let events: Vec<_> = app.login_use_case().invoke().collect().await;
    assert_eq!(
        events,
        vec![
            Resource::Loading,
            Resource::success(format!("refresh-{USER}-1"))
        ]
    );
    assert_eq!(
        app.session().refresh_token(),
        Some(format!("refresh-{USER}-1"))
    );
}

#[tokio::test]
async fn happy_path_login_navigates_once() {
    let cloud = cloud();
    let app = app(&cloud, PASSWORD);
    let navigator = Arc::new(RecordingNavigator::default());

    let login = app.login_presenter();
    login.bind_navigation(navigator.clone());

    let update = wait_for_terminal(login.status()).await;
    assert_eq!(update.status, Status::Success);

    // Replay the same terminal value to every observer a few more times.
    for _ in 0..3 {
        login.status().set(update);
        tokio::task::yield_now().await;
    }
    login.bind_navigation(navigator.clone());
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    assert_eq!(*navigator.0.lock(), vec![Destination::Lights]);
}

#[tokio::test]
async fn rejected_credentials() {
    let cloud = cloud();
    let app = app(&cloud, "wrong");
    let navigator = Arc::new(RecordingNavigator::default());

    let events: Vec<_> = app.login_use_case().invoke().collect().await;
    assert_eq!(
        events,
        vec![Resource::Loading, Resource::error(INVALID_CREDENTIALS)]
    );

    let login = app.login_presenter();
    login.bind_navigation(navigator.clone());
    let update = wait_for_terminal(login.status()).await;
    assert_eq!(update.status, Status::Error);
    tokio::task::yield_now().await;

    assert!(navigator.0.lock().is_empty());
    assert!(!app.session().is_authenticated());
}

#[tokio::test]
async fn listing_without_session_is_an_error() {
    let cloud = cloud();
    let app = app(&cloud, PASSWORD);

    let events: Vec<_> = app.lights_use_case().invoke().collect().await;
    assert_eq!(
        events,
        vec![Resource::Loading, Resource::error("No active session")]
    );
}

#[tokio::test]
async fn listing_after_login_preserves_order() {
    let cloud = cloud();
    let app = app(&cloud, PASSWORD);
    let _: Vec<_> = app.login_use_case().invoke().collect().await;

    let events: Vec<_> = app.lights_use_case().invoke().collect().await;
    assert_eq!(events, vec![Resource::Loading, Resource::success(devices())]);
}

#[tokio::test]
async fn lights_presenter_keeps_snapshot() {
    let cloud = cloud();
    let app = app(&cloud, PASSWORD);
    let _: Vec<_> = app.login_use_case().invoke().collect().await;

    let lights = app.lights_presenter();
    let update = wait_for_terminal(lights.status()).await;
    assert_eq!(update.status, Status::Success);
    assert_eq!(lights.devices(), devices());
}

#[tokio::test(start_paused = true)]
async fn lights_presenter_waits_for_start_delay() {
    let cloud = cloud();
    let config = CloudConfig::builder("app-id", "app-secret")
        .credentials(Credentials::new(USER, PASSWORD))
        .build()
        .unwrap();
    let app = App::with_sdk(config, cloud.clone()).unwrap();
    let _: Vec<_> = app.login_use_case().invoke().collect().await;

    let lights = app.lights_presenter();
    tokio::time::sleep(Duration::from_millis(1999)).await;
    assert_eq!(lights.status().current(), None);

    let update = wait_for_terminal(lights.status()).await;
    assert_eq!(update.status, Status::Success);
}

#[tokio::test]
async fn vendor_failures_are_normalized() {
    let cloud = cloud();
    let app = app(&cloud, PASSWORD);

    cloud.fail_next_sign_in(SdkError::network("connect ECONNREFUSED"));
    let events: Vec<_> = app.login_use_case().invoke().collect().await;
    assert_eq!(
        events[1],
        Resource::error("Couldn't reach server. Check your internet connection.")
    );

    cloud.fail_next_sign_in(SdkError::server(503, "Service temporarily unavailable"));
    let events: Vec<_> = app.login_use_case().invoke().collect().await;
    assert_eq!(events[1], Resource::error("Service temporarily unavailable"));

    cloud.fail_next_sign_in(SdkError::Json("unexpected end of input".into()));
    let events: Vec<_> = app.login_use_case().invoke().collect().await;
    assert_eq!(events[1], Resource::error("An unexpected error occurred"));

    // No retry: each failure cost exactly one vendor call.
    assert_eq!(cloud.sign_in_count(), 3);
    assert!(!app.session().is_authenticated());
}

#[tokio::test]
async fn double_callback_resolves_once() {
    let cloud = cloud();
    cloud.set_double_callback(true);
    let app = app(&cloud, PASSWORD);

    let events: Vec<_> = app.login_use_case().invoke().collect().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].status(), Status::Success);
}

#[tokio::test(start_paused = true)]
async fn concurrent_logins_are_independent() {
    let cloud = Arc::new(SimulatedCloud::new().with_latency(Duration::from_millis(100)));
    cloud.add_account(USER, PASSWORD, devices());
    let app = app(&cloud, PASSWORD);
    let use_case = app.login_use_case();

    let first = tokio::spawn(use_case.invoke().collect::<Vec<_>>());
    let second = tokio::spawn(use_case.invoke().collect::<Vec<_>>());
    let cancelled = tokio::spawn(use_case.invoke().collect::<Vec<_>>());
    tokio::task::yield_now().await;
    cancelled.abort();

    let first = first.await.unwrap();
    let second = second.await.unwrap();
    assert!(cancelled.await.unwrap_err().is_cancelled());

    for events in [&first, &second] {
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], Resource::Loading);
        assert_eq!(events[1].status(), Status::Success);
    }
    assert_ne!(first[1], second[1]);
}

#[tokio::test(start_paused = true)]
async fn cancelled_presenter_stops_publishing() {
    let cloud = Arc::new(SimulatedCloud::new().with_latency(Duration::from_millis(500)));
    cloud.add_account(USER, PASSWORD, devices());
    let app = app(&cloud, PASSWORD);

    let login = app.login_presenter();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(login.status().status(), Some(Status::Loading));

    login.cancel();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(login.status().status(), Some(Status::Loading));
    // The remote call itself was not aborted, but the abandoned sign-in
    // never reached the local session store.
    assert!(cloud.has_session("WiserSession"));
    assert!(!app.session().is_authenticated());
}

#[tokio::test]
async fn relisting_reflects_vendor_snapshot_at_call_time() {
    let cloud = cloud();
    let app = app(&cloud, PASSWORD);
    let _: Vec<_> = app.login_use_case().invoke().collect().await;

    cloud.set_devices(USER, vec![LightDevice::new("only")]);
    let events: Vec<_> = app.lights_use_case().invoke().collect().await;
    assert_eq!(
        events.last(),
        Some(&Resource::success(vec![LightDevice::new("only")]))
    );
}
