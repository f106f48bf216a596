/**
 * Login Flow Example
 *
 * This example walks through both screens: the login presenter signs in,
 * navigates once to the lights screen on success, and the lights presenter
 * fetches the device list after its start delay.
 *
 * Pass a JSON config file path as the first argument to override the defaults.
 */
use cloudlights::presenter::{Destination, Navigator};
use cloudlights::{
    App, CloudConfig, ConnectionStatus, Credentials, LightDevice, SimulatedCloud, Status,
};
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

struct ChannelNavigator(mpsc::UnboundedSender<Destination>);

impl Navigator for ChannelNavigator {
    fn navigate(&self, destination: Destination) {
        let _ = self.0.send(destination);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    println!("--- Cloudlights - Login Flow ---");

    // 1. Stand up the simulated vendor cloud with one account
    let cloud = Arc::new(SimulatedCloud::new().with_latency(Duration::from_millis(300)));
    cloud.add_account(
        "demo@example.com",
        "demo-password",
        vec![
            LightDevice::new("AC000W0000001")
                .with_product_name("Living Room")
                .with_oem_model("SQR226U1XXW")
                .with_status(ConnectionStatus::Online),
            LightDevice::new("AC000W0000002")
                .with_product_name("Bedroom")
                .with_oem_model("SQR141U1XXW")
                .with_status(ConnectionStatus::Offline),
        ],
    );

    // 2. Load configuration
    let config = match std::env::args().nth(1) {
        Some(path) => CloudConfig::from_file(path)?,
        None => CloudConfig::builder("demo-app-id", "demo-app-secret")
            .credentials(Credentials::new("demo@example.com", "demo-password"))
            .lights_start_delay(Duration::from_millis(500))
            .build()?,
    };
    let app = App::with_sdk(config, cloud)?;

    // 3. Login screen
    let (nav_tx, mut nav_rx) = mpsc::unbounded_channel();
    let login = app.login_presenter();
    login.bind_navigation(Arc::new(ChannelNavigator(nav_tx)));

    let mut login_status = Box::pin(login.status().updates());
    let navigate = async {
        loop {
            tokio::select! {
                Some(update) = login_status.next() => {
                    println!("[LOGIN] {}", update.status);
                    if update.status == Status::Error {
                        return None;
                    }
                }
                Some(destination) = nav_rx.recv() => return Some(destination),
                else => return None,
            }
        }
    };

    if navigate.await != Some(Destination::Lights) {
        println!("[ERROR] Login failed. Exiting.");
        return Ok(());
    }
    login.cancel();

    // 4. Lights screen
    let lights = app.lights_presenter();
    let mut lights_status = Box::pin(lights.status().updates());
    while let Some(update) = lights_status.next().await {
        println!("[LIGHTS] {}", update.status);
        if update.status != Status::Loading {
            break;
        }
    }

    for device in lights.devices() {
        println!(
            "  {} {:<12} online={} manages={:?}",
            device.dsn,
            device.product_name.as_deref().unwrap_or("-"),
            device.is_online(),
            device.managed_properties()
        );
    }
    Ok(())
}
