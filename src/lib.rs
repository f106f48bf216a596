//! # Cloudlights
//!
//! Asynchronous client shell for a vendor IoT cloud: signs a user in, lists the
//! account's lights, and drives screen state from both operations.
//!
//! Every remote operation is exposed as a use case whose invocations yield a
//! stream of [`Resource`] values: `Loading`, then exactly one `Success` or `Error`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cloudlights::{App, CloudConfig, Credentials, SimulatedCloud, UseCase};
//! use futures_util::StreamExt;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let cloud = Arc::new(SimulatedCloud::new());
//! cloud.add_account("user@example.com", "secret", vec![]);
//!
//! let config = CloudConfig::builder("APP_ID", "APP_SECRET")
//!     .credentials(Credentials::new("user@example.com", "secret"))
//!     .build()?;
//! let app = App::with_sdk(config, cloud)?;
//!
//! let mut login = app.login_use_case().invoke();
//! while let Some(state) = login.next().await {
//!     println!("{:?}", state.status());
//! }
//! # Ok(())
//! # }
//! ```
//!
#[macro_use]
mod macros;
pub mod app;
pub mod config;
pub mod device;
pub mod error;
pub mod presenter;
pub mod repository;
pub mod resource;
pub mod sdk;
pub mod session;
pub mod simulator;
pub mod usecase;

pub use app::App;
pub use config::{CloudConfig, ServiceLocation, ServiceType};
pub use device::{ConnectionStatus, LightDevice};
pub use error::{CloudError, ErrorKind, SdkError};
pub use presenter::{Destination, LightsPresenter, LoginPresenter, Navigator, StatusCell};
pub use resource::{Resource, Status};
pub use sdk::Credentials;
pub use session::SessionStore;
pub use simulator::SimulatedCloud;
pub use usecase::{AllLightsUseCase, LoginUseCase, UseCase};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> &'static str {
    VERSION
}
