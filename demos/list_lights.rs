/**
 * Device Listing Example (Resource Streams)
 *
 * This example drives the use cases directly and prints every Resource state,
 * including the error reported when listing is attempted before sign-in.
 */
use cloudlights::{App, CloudConfig, Credentials, LightDevice, Resource, SimulatedCloud, UseCase};
use futures_util::StreamExt;
use std::sync::Arc;

fn print_state<T: std::fmt::Debug>(label: &str, state: &Resource<T>) {
    match state {
        Resource::Loading => println!("[{label}] Loading..."),
        Resource::Success(data) => println!("[{label}] Success: {data:?}"),
        Resource::Error(message) => println!("[{label}] Error: {message}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    println!("--- Cloudlights - List Lights ---");

    let cloud = Arc::new(SimulatedCloud::new());
    cloud.add_account(
        "demo@example.com",
        "demo-password",
        vec![
            LightDevice::new("AC000W0000010").with_product_name("Desk"),
            LightDevice::new("AC000W0000011").with_product_name("Shelf"),
            LightDevice::new("AC000W0000012").with_product_name("Ceiling"),
        ],
    );

    let config = CloudConfig::builder("demo-app-id", "demo-app-secret")
        .credentials(Credentials::new("demo@example.com", "demo-password"))
        .build()?;
    let app = App::with_sdk(config, cloud)?;

    // 1. Listing before sign-in fails with "No active session"
    let mut stream = app.lights_use_case().invoke();
    while let Some(state) = stream.next().await {
        print_state("LIGHTS", &state);
    }

    // 2. Sign in
    let mut stream = app.login_use_case().invoke();
    while let Some(state) = stream.next().await {
        print_state("LOGIN", &state);
    }

    // 3. Listing now returns the account's devices in vendor order
    let mut stream = app.lights_use_case().invoke();
    while let Some(state) = stream.next().await {
        print_state("LIGHTS", &state);
    }

    Ok(())
}
