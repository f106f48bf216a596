//! Process-lifetime holder for the authenticated session.
//!
//! The login adapter is the only writer; every other adapter reads a snapshot.
//! Nothing here is persisted.

use log::{debug, info};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::SystemTime;

/// An authenticated context produced by a successful sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub refresh_token: String,
    pub access_token: String,
    pub expires_in: Option<u64>,
    pub established_at: SystemTime,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("name", &self.name)
            .field("refresh_token", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("established_at", &self.established_at)
            .finish()
    }
}

/// Shared, synchronized session cell. Clones share the same slot.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous session.
    pub fn set(&self, session: Session) {
        info!("Session '{}' established", session.name);
        *self.inner.write() = Some(session);
    }

    pub fn get(&self) -> Option<Session> {
        self.inner.read().clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner.read().as_ref().map(|s| s.refresh_token.clone())
    }

    pub fn session_name(&self) -> Option<String> {
        self.inner.read().as_ref().map(|s| s.name.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_some()
    }

    pub fn clear(&self) {
        if let Some(old) = self.inner.write().take() {
            debug!("Session '{}' cleared", old.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: &str) -> Session {
        Session {
            name: "WiserSession".into(),
            refresh_token: token.into(),
            access_token: format!("access-{token}"),
            expires_in: Some(3600),
            established_at: SystemTime::now(),
        }
    }

    #[test]
    fn starts_empty() {
        let store = SessionStore::new();
        assert!(!store.is_authenticated());
        assert_eq!(store.get(), None);
        assert_eq!(store.refresh_token(), None);
    }

    #[test]
    fn clones_share_state() {
        let writer = SessionStore::new();
        let reader = writer.clone();

        writer.set(session("r1"));
        assert_eq!(reader.refresh_token().as_deref(), Some("r1"));
        assert_eq!(reader.session_name().as_deref(), Some("WiserSession"));

        writer.set(session("r2"));
        assert_eq!(reader.refresh_token().as_deref(), Some("r2"));

        reader.clear();
        assert!(!writer.is_authenticated());
    }

    #[test]
    fn debug_redacts_tokens() {
        let text = format!("{:?}", session("secret-refresh"));
        assert!(!text.contains("secret-refresh"));
        assert!(text.contains("WiserSession"));
    }
}
