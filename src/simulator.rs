//! In-process stand-in for the vendor cloud.
//!
//! Implements the SDK traits with registered accounts, ordered per-account device
//! lists, optional latency and one-shot fault injection. Used by the demos and
//! the test suites.

use crate::device::LightDevice;
use crate::error::SdkError;
use crate::sdk::{
    AuthResult, Credentials, DeviceManager, LoginManager, SessionRegistry, SignInFailure,
    SignInSuccess,
};
use async_trait::async_trait;
use log::{debug, info};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::time::Duration;

pub const INVALID_CREDENTIALS: &str = "Invalid username or password";
const TOKEN_TTL_SECS: u64 = 86_400;

struct Account {
    password: String,
    devices: Vec<LightDevice>,
}

#[derive(Default)]
struct Faults {
    sign_in: Option<SdkError>,
    listing: Option<SdkError>,
    double_callback: bool,
}

struct CloudInner {
    accounts: RwLock<HashMap<String, Account>>,
    /// Session name -> username
    sessions: RwLock<HashMap<String, String>>,
    latency: RwLock<Duration>,
    faults: Mutex<Faults>,
    sign_in_count: AtomicUsize,
    token_seq: AtomicU64,
}

/// A fake vendor cloud. Clones share state.
#[derive(Clone)]
pub struct SimulatedCloud {
    inner: Arc<CloudInner>,
}

impl SimulatedCloud {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CloudInner {
                accounts: RwLock::new(HashMap::new()),
                sessions: RwLock::new(HashMap::new()),
                latency: RwLock::new(Duration::ZERO),
                faults: Mutex::new(Faults::default()),
                sign_in_count: AtomicUsize::new(0),
                token_seq: AtomicU64::new(0),
            }),
        }
    }

    /// Delay applied to every sign-in and listing.
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.inner.latency.write() = latency;
        self
    }

    pub fn add_account<U, P>(&self, username: U, password: P, devices: Vec<LightDevice>)
    where
        U: Into<String>,
        P: Into<String>,
    {
        self.inner.accounts.write().insert(
            username.into(),
            Account {
                password: password.into(),
                devices,
            },
        );
    }

    /// Replaces an account's device list. Returns `false` for unknown accounts.
    pub fn set_devices(&self, username: &str, devices: Vec<LightDevice>) -> bool {
        match self.inner.accounts.write().get_mut(username) {
            Some(account) => {
                account.devices = devices;
                true
            }
            None => false,
        }
    }

    /// The next sign-in fails with `err` regardless of credentials.
    pub fn fail_next_sign_in(&self, err: SdkError) {
        self.inner.faults.lock().sign_in = Some(err);
    }

    /// The next device listing fails with `err`.
    pub fn fail_next_listing(&self, err: SdkError) {
        self.inner.faults.lock().listing = Some(err);
    }

    /// Misbehave by invoking both sign-in callbacks.
    pub fn set_double_callback(&self, enabled: bool) {
        self.inner.faults.lock().double_callback = enabled;
    }

    pub fn sign_in_count(&self) -> usize {
        self.inner.sign_in_count.load(Ordering::SeqCst)
    }

    pub fn has_session(&self, session_name: &str) -> bool {
        self.inner.sessions.read().contains_key(session_name)
    }

    pub fn sign_out(&self, session_name: &str) {
        if self.inner.sessions.write().remove(session_name).is_some() {
            info!("Simulated cloud closed session '{}'", session_name);
        }
    }

    fn latency(&self) -> Duration {
        *self.inner.latency.read()
    }

    fn authenticate(&self, credentials: &Credentials, session_name: &str) -> Result<AuthResult, SdkError> {
        if let Some(err) = self.inner.faults.lock().sign_in.take() {
            return Err(err);
        }

        let accounts = self.inner.accounts.read();
        match accounts.get(&credentials.username) {
            Some(account) if account.password == credentials.password => {}
            _ => return Err(SdkError::auth(INVALID_CREDENTIALS)),
        }
        drop(accounts);

        self.inner
            .sessions
            .write()
            .insert(session_name.to_string(), credentials.username.clone());

        let seq = self.inner.token_seq.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(AuthResult {
            refresh_token: format!("refresh-{}-{}", credentials.username, seq),
            access_token: format!("access-{seq}"),
            expires_in: Some(TOKEN_TTL_SECS),
        })
    }
}

impl Default for SimulatedCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginManager for SimulatedCloud {
    /// Completes asynchronously on the current Tokio runtime.
    fn sign_in(
        &self,
        credentials: Credentials,
        session_name: &str,
        on_success: SignInSuccess,
        on_failure: SignInFailure,
    ) {
        self.inner.sign_in_count.fetch_add(1, Ordering::SeqCst);
        let cloud = self.clone();
        let session_name = session_name.to_string();

        tokio::spawn(async move {
            let latency = cloud.latency();
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }

            let double = cloud.inner.faults.lock().double_callback;
            match cloud.authenticate(&credentials, &session_name) {
                Ok(auth) => {
                    debug!("Simulated sign-in accepted for {}", credentials.username);
                    on_success(auth);
                    if double {
                        on_failure(SdkError::Internal("duplicate completion".into()));
                    }
                }
                Err(err) => {
                    debug!("Simulated sign-in rejected: {}", err);
                    on_failure(err);
                    if double {
                        on_success(AuthResult {
                            refresh_token: "stale".into(),
                            access_token: "stale".into(),
                            expires_in: None,
                        });
                    }
                }
            }
        });
    }
}

impl SessionRegistry for SimulatedCloud {
    fn device_manager(&self, session_name: &str) -> Option<Arc<dyn DeviceManager>> {
        let username = self.inner.sessions.read().get(session_name).cloned()?;
        Some(Arc::new(SimulatedDeviceManager {
            cloud: self.clone(),
            username,
        }))
    }
}

/// Device manager bound to one simulated session.
pub struct SimulatedDeviceManager {
    cloud: SimulatedCloud,
    username: String,
}

#[async_trait]
impl DeviceManager for SimulatedDeviceManager {
    async fn devices(&self) -> Result<Vec<LightDevice>, SdkError> {
        let latency = self.cloud.latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if let Some(err) = self.cloud.inner.faults.lock().listing.take() {
            return Err(err);
        }

        self.cloud
            .inner
            .accounts
            .read()
            .get(&self.username)
            .map(|account| account.devices.clone())
            .ok_or_else(|| SdkError::auth("Account no longer exists"))
    }
}
