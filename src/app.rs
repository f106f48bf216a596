//! Composition root: wires configuration, the vendor SDK, the session store,
//! the adapters and the use cases, and hands out screen presenters.

use crate::config::CloudConfig;
use crate::error::ConfigError;
use crate::presenter::{LightsPresenter, LoginPresenter};
use crate::repository::{LightsDataSource, LoginDataSource};
use crate::sdk::{LoginManager, SessionRegistry};
use crate::session::SessionStore;
use crate::usecase::{AllLightsUseCase, LoginUseCase};
use log::info;
use std::sync::Arc;

pub struct App {
    config: CloudConfig,
    session: SessionStore,
    login: Arc<LoginUseCase>,
    lights: Arc<AllLightsUseCase>,
}

impl App {
    /// Validates `config` and builds the object graph. No remote call is made.
    pub fn new(
        config: CloudConfig,
        login_manager: Arc<dyn LoginManager>,
        session_registry: Arc<dyn SessionRegistry>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            "Configuring client for app {} ({} / {}, dss={}, offline={})",
            config.app_id,
            config.service_type,
            config.service_location,
            config.allow_dss,
            config.allow_offline_use
        );

        let session = SessionStore::new();
        let login_source = LoginDataSource::new(
            login_manager,
            config.credentials_or_empty(),
            config.session_name.clone(),
            session.clone(),
        );
        let lights_source = LightsDataSource::new(session_registry, session.clone());

        Ok(Self {
            login: Arc::new(LoginUseCase::new(Arc::new(login_source))),
            lights: Arc::new(AllLightsUseCase::new(Arc::new(lights_source))),
            config,
            session,
        })
    }

    /// Builds an app whose SDK handle serves both login and session lookup.
    pub fn with_sdk<S>(config: CloudConfig, sdk: Arc<S>) -> Result<Self, ConfigError>
    where
        S: LoginManager + SessionRegistry + 'static,
    {
        Self::new(config, sdk.clone(), sdk)
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn login_use_case(&self) -> Arc<LoginUseCase> {
        self.login.clone()
    }

    pub fn lights_use_case(&self) -> Arc<AllLightsUseCase> {
        self.lights.clone()
    }

    /// Must be called within a Tokio runtime; sign-in starts immediately.
    pub fn login_presenter(&self) -> LoginPresenter {
        LoginPresenter::new(self.login.clone())
    }

    /// Must be called within a Tokio runtime; the first fetch starts after the
    /// configured delay.
    pub fn lights_presenter(&self) -> LightsPresenter {
        LightsPresenter::new(self.lights.clone(), self.config.lights_start_delay())
    }
}
