//! Startup configuration for the cloud client.
//!
//! Loaded once from JSON or assembled with [`CloudConfigBuilder`]; the composition
//! root validates it before any adapter is created.

use crate::error::ConfigError;
use crate::sdk::Credentials;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_SESSION_NAME: &str = "WiserSession";
pub const DEFAULT_LIGHTS_START_DELAY_MS: u64 = 2000;

define_labeled_enum! {
    /// Which vendor service tier to talk to.
    pub enum ServiceType {
        Field => "Field",
        Development => "Development",
    }
}

define_labeled_enum! {
    /// Vendor service region.
    pub enum ServiceLocation {
        USA => "USA",
        China => "China",
        Europe => "Europe",
    }
}

fn default_service_type() -> ServiceType {
    ServiceType::Field
}

fn default_service_location() -> ServiceLocation {
    ServiceLocation::USA
}

fn default_true() -> bool {
    true
}

fn default_session_name() -> String {
    DEFAULT_SESSION_NAME.to_string()
}

fn default_lights_start_delay_ms() -> u64 {
    DEFAULT_LIGHTS_START_DELAY_MS
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CloudConfig {
    pub app_id: String,
    pub app_secret: String,
    #[serde(default = "default_service_type")]
    pub service_type: ServiceType,
    #[serde(default = "default_service_location")]
    pub service_location: ServiceLocation,
    #[serde(default = "default_true")]
    pub allow_dss: bool,
    #[serde(default = "default_true")]
    pub allow_offline_use: bool,
    #[serde(default = "default_session_name")]
    pub session_name: String,
    /// Account used by the login screen; an empty pair when absent.
    #[serde(default)]
    pub credentials: Option<Credentials>,
    #[serde(default = "default_lights_start_delay_ms")]
    pub lights_start_delay_ms: u64,
}

impl std::fmt::Debug for CloudConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("service_type", &self.service_type)
            .field("service_location", &self.service_location)
            .field("allow_dss", &self.allow_dss)
            .field("allow_offline_use", &self.allow_offline_use)
            .field("session_name", &self.session_name)
            .field("credentials", &self.credentials)
            .field("lights_start_delay_ms", &self.lights_start_delay_ms)
            .finish()
    }
}

impl CloudConfig {
    pub fn builder<I, S>(app_id: I, app_secret: S) -> CloudConfigBuilder
    where
        I: Into<String>,
        S: Into<String>,
    {
        CloudConfigBuilder::new(app_id, app_secret)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_id.trim().is_empty() {
            return Err(ConfigError::MissingField("app_id"));
        }
        if self.app_secret.trim().is_empty() {
            return Err(ConfigError::MissingField("app_secret"));
        }
        if self.session_name.trim().is_empty() {
            return Err(ConfigError::MissingField("session_name"));
        }
        Ok(())
    }

    pub fn lights_start_delay(&self) -> Duration {
        Duration::from_millis(self.lights_start_delay_ms)
    }

    pub fn credentials_or_empty(&self) -> Credentials {
        self.credentials
            .clone()
            .unwrap_or_else(|| Credentials::new("", ""))
    }
}

/// Builder for [`CloudConfig`] with the same defaults as the JSON form.
pub struct CloudConfigBuilder {
    config: CloudConfig,
}

impl CloudConfigBuilder {
    pub fn new<I, S>(app_id: I, app_secret: S) -> Self
    where
        I: Into<String>,
        S: Into<String>,
    {
        Self {
            config: CloudConfig {
                app_id: app_id.into(),
                app_secret: app_secret.into(),
                service_type: default_service_type(),
                service_location: default_service_location(),
                allow_dss: true,
                allow_offline_use: true,
                session_name: default_session_name(),
                credentials: None,
                lights_start_delay_ms: DEFAULT_LIGHTS_START_DELAY_MS,
            },
        }
    }

    pub fn service_type(mut self, service_type: ServiceType) -> Self {
        self.config.service_type = service_type;
        self
    }

    pub fn service_location(mut self, location: ServiceLocation) -> Self {
        self.config.service_location = location;
        self
    }

    pub fn allow_dss(mut self, allow: bool) -> Self {
        self.config.allow_dss = allow;
        self
    }

    pub fn allow_offline_use(mut self, allow: bool) -> Self {
        self.config.allow_offline_use = allow;
        self
    }

    pub fn session_name<S: Into<String>>(mut self, name: S) -> Self {
        self.config.session_name = name.into();
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config.credentials = Some(credentials);
        self
    }

    pub fn lights_start_delay(mut self, delay: Duration) -> Self {
        self.config.lights_start_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn build(self) -> Result<CloudConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_defaults() {
        let config = CloudConfig::from_json_str(r#"{"app_id": "id", "app_secret": "secret"}"#)
            .unwrap();
        assert_eq!(config.service_type, ServiceType::Field);
        assert_eq!(config.service_location, ServiceLocation::USA);
        assert!(config.allow_dss);
        assert!(config.allow_offline_use);
        assert_eq!(config.session_name, DEFAULT_SESSION_NAME);
        assert_eq!(config.lights_start_delay(), Duration::from_secs(2));
        assert_eq!(config.credentials, None);
    }

    #[test]
    fn json_full() {
        let raw = r#"{
            "app_id": "id",
            "app_secret": "secret",
            "service_type": "Development",
            "service_location": "europe",
            "allow_dss": false,
            "session_name": "Home",
            "credentials": {"username": "u@example.com", "password": "pw"},
            "lights_start_delay_ms": 0
        }"#;
        let config = CloudConfig::from_json_str(raw).unwrap();
        assert_eq!(config.service_type, ServiceType::Development);
        assert_eq!(config.service_location, ServiceLocation::Europe);
        assert!(!config.allow_dss);
        assert_eq!(config.session_name, "Home");
        assert_eq!(config.credentials_or_empty().username, "u@example.com");
        assert!(config.lights_start_delay().is_zero());
    }

    #[test]
    fn rejects_empty_secret() {
        let err = CloudConfig::from_json_str(r#"{"app_id": "id", "app_secret": " "}"#)
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingField("app_secret"));
    }

    #[test]
    fn rejects_unknown_region() {
        let err = CloudConfig::from_json_str(
            r#"{"app_id": "id", "app_secret": "s", "service_location": "Mars"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn builder_matches_json_defaults() {
        let built = CloudConfig::builder("id", "secret").build().unwrap();
        let parsed =
            CloudConfig::from_json_str(r#"{"app_id": "id", "app_secret": "secret"}"#).unwrap();
        assert_eq!(built, parsed);
    }

    #[test]
    fn builder_validates() {
        assert_eq!(
            CloudConfig::builder("id", "s").session_name("").build(),
            Err(ConfigError::MissingField("session_name"))
        );
    }

    #[test]
    fn debug_redacts_secret() {
        let config = CloudConfig::builder("id", "top-secret").build().unwrap();
        assert!(!format!("{config:?}").contains("top-secret"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CloudConfig::from_file("/nonexistent/cloudlights.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
