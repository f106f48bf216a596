//! Interfaces of the vendor cloud SDK consumed by the repository adapters.
//!
//! Only `repository` calls into these traits; vendor types and errors do not
//! travel past that layer.

use crate::device::LightDevice;
use crate::error::SdkError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Username/password credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Tokens issued by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub refresh_token: String,
    pub access_token: String,
    pub expires_in: Option<u64>,
}

pub type SignInSuccess = Box<dyn FnOnce(AuthResult) + Send + 'static>;
pub type SignInFailure = Box<dyn FnOnce(SdkError) + Send + 'static>;

/// The vendor's callback-style login entry point.
///
/// A well-behaved implementation invokes exactly one of the callbacks, possibly
/// from another thread and after `sign_in` has returned.
pub trait LoginManager: Send + Sync {
    fn sign_in(
        &self,
        credentials: Credentials,
        session_name: &str,
        on_success: SignInSuccess,
        on_failure: SignInFailure,
    );
}

/// Device management scoped to one authenticated session.
#[async_trait]
pub trait DeviceManager: Send + Sync {
    /// Current device snapshot, in vendor order.
    async fn devices(&self) -> Result<Vec<LightDevice>, SdkError>;
}

/// Looks up the device manager of a named session.
pub trait SessionRegistry: Send + Sync {
    fn device_manager(&self, session_name: &str) -> Option<Arc<dyn DeviceManager>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("user@example.com", "hunter2");
        let text = format!("{creds:?}");
        assert!(text.contains("user@example.com"));
        assert!(!text.contains("hunter2"));
    }
}
