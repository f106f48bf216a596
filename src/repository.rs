//! Repository adapters over the vendor SDK.
//! Each adapter performs one remote capability and returns a single result;
//! vendor errors are converted to [`CloudError`] here.

use crate::device::LightDevice;
use crate::error::{CloudError, Result, SdkError};
use crate::sdk::{AuthResult, Credentials, LoginManager, SessionRegistry};
use crate::session::{Session, SessionStore};
use async_trait::async_trait;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::oneshot;

/// Signs the configured user in and returns the refresh token.
#[async_trait]
pub trait LoginRepository: Send + Sync {
    async fn sign_in(&self) -> Result<String>;
}

/// Returns the device snapshot of the current session.
#[async_trait]
pub trait LightsRepository: Send + Sync {
    async fn all_lights(&self) -> Result<Vec<LightDevice>>;
}

/// A oneshot sender shared by several continuations; only the first to
/// settle delivers a value.
struct SettleOnce<T> {
    tx: Arc<Mutex<Option<oneshot::Sender<T>>>>,
}

impl<T> Clone for SettleOnce<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> SettleOnce<T> {
    fn channel() -> (Self, oneshot::Receiver<T>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                tx: Arc::new(Mutex::new(Some(tx))),
            },
            rx,
        )
    }

    /// Returns `false` if a value was already delivered.
    fn settle(&self, value: T) -> bool {
        match self.tx.lock().take() {
            Some(tx) => {
                // The receiver may be gone if the caller stopped waiting.
                let _ = tx.send(value);
                true
            }
            None => false,
        }
    }
}

type SignInOutcome = std::result::Result<AuthResult, SdkError>;

/// Login adapter. Stores the session on success.
///
/// The session is recorded only when the sign-in future is polled to
/// completion. If it is dropped mid-call the vendor may still open the
/// session, but the [`SessionStore`] stays unchanged and listing reports
/// [`CloudError::NoSession`] until the next completed sign-in.
pub struct LoginDataSource {
    login_manager: Arc<dyn LoginManager>,
    credentials: Credentials,
    session_name: String,
    session: SessionStore,
}

impl LoginDataSource {
    pub fn new<S: Into<String>>(
        login_manager: Arc<dyn LoginManager>,
        credentials: Credentials,
        session_name: S,
        session: SessionStore,
    ) -> Self {
        Self {
            login_manager,
            credentials,
            session_name: session_name.into(),
            session,
        }
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// Turns the two-callback vendor call into one awaited outcome.
    async fn sign_in_once(&self) -> Result<SignInOutcome> {
        let (settle, rx) = SettleOnce::<SignInOutcome>::channel();
        let on_failure = settle.clone();

        self.login_manager.sign_in(
            self.credentials.clone(),
            &self.session_name,
            Box::new(move |auth| {
                if !settle.settle(Ok(auth)) {
                    warn!("Ignoring sign-in success reported after completion");
                }
            }),
            Box::new(move |err| {
                if !on_failure.settle(Err(err)) {
                    warn!("Ignoring sign-in failure reported after completion");
                }
            }),
        );

        rx.await.map_err(|_| {
            CloudError::Bridge("sign-in finished without invoking a callback".to_string())
        })
    }
}

#[async_trait]
impl LoginRepository for LoginDataSource {
    async fn sign_in(&self) -> Result<String> {
        info!(
            "Signing in as {} (session '{}')",
            self.credentials.username, self.session_name
        );

        match self.sign_in_once().await? {
            Ok(auth) => {
                self.session.set(Session {
                    name: self.session_name.clone(),
                    refresh_token: auth.refresh_token.clone(),
                    access_token: auth.access_token,
                    expires_in: auth.expires_in,
                    established_at: SystemTime::now(),
                });
                Ok(auth.refresh_token)
            }
            Err(err) => {
                warn!("Sign-in for {} failed: {}", self.credentials.username, err);
                Err(err.into())
            }
        }
    }
}

/// Device listing adapter.
///
/// Listing without an authenticated session fails with [`CloudError::NoSession`]
/// instead of querying the vendor.
pub struct LightsDataSource {
    registry: Arc<dyn SessionRegistry>,
    session: SessionStore,
}

impl LightsDataSource {
    pub fn new(registry: Arc<dyn SessionRegistry>, session: SessionStore) -> Self {
        Self { registry, session }
    }
}

#[async_trait]
impl LightsRepository for LightsDataSource {
    async fn all_lights(&self) -> Result<Vec<LightDevice>> {
        let Some(name) = self.session.session_name() else {
            warn!("Device listing requested without an active session");
            return Err(CloudError::NoSession);
        };

        let manager = self.registry.device_manager(&name).ok_or_else(|| {
            warn!("Vendor has no device manager for session '{}'", name);
            CloudError::NoSession
        })?;

        let devices = manager.devices().await?;
        debug!("Session '{}' reports {} devices", name, devices.len());
        Ok(devices)
    }
}
