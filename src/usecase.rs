//! Use cases: one remote operation exposed as a lazy stream of [`Resource`] values.
//!
//! Every call to [`UseCase::invoke`] returns a fresh stream that does nothing until
//! polled, then yields `Loading` (if enabled), awaits the repository exactly once,
//! and ends with a single `Success` or `Error`. Failures are classified and
//! replaced by their normalized message; the raw error only reaches the log.

use crate::device::LightDevice;
use crate::error::Result;
use crate::repository::{LightsRepository, LoginRepository};
use crate::resource::Resource;
use futures_core::stream::Stream;
use log::{debug, warn};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Stream produced by one invocation.
pub type ResourceStream<T> = Pin<Box<dyn Stream<Item = Resource<T>> + Send + 'static>>;

pub trait UseCase: Send + Sync {
    type Output: Send + 'static;

    /// Starts a new, independent invocation.
    fn invoke(&self) -> ResourceStream<Self::Output>;
}

/// Wraps a single fallible async call into a `Resource` stream.
pub fn resource_flow<T, F, Fut>(
    operation: &'static str,
    emit_loading: bool,
    call: F,
) -> ResourceStream<T>
where
    T: Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    Box::pin(async_stream::stream! {
        if emit_loading {
            yield Resource::Loading;
        }

        match call().await {
            Ok(data) => {
                debug!("{} succeeded", operation);
                yield Resource::Success(data);
            }
            Err(err) => {
                warn!("{} failed [{}]: {}", operation, err.kind(), err);
                yield Resource::Error(err.user_message());
            }
        }
    })
}

/// Signs in and yields the refresh token.
///
/// A successful invocation also stores the session in the repository's
/// [`SessionStore`](crate::session::SessionStore).
pub struct LoginUseCase {
    repository: Arc<dyn LoginRepository>,
    emit_loading: bool,
}

impl LoginUseCase {
    pub fn new(repository: Arc<dyn LoginRepository>) -> Self {
        Self {
            repository,
            emit_loading: true,
        }
    }

    pub fn with_loading(mut self, emit_loading: bool) -> Self {
        self.emit_loading = emit_loading;
        self
    }
}

impl UseCase for LoginUseCase {
    type Output = String;

    fn invoke(&self) -> ResourceStream<String> {
        let repository = self.repository.clone();
        resource_flow("login", self.emit_loading, move || async move {
            repository.sign_in().await
        })
    }
}

/// Yields the device snapshot of the signed-in account.
pub struct AllLightsUseCase {
    repository: Arc<dyn LightsRepository>,
    emit_loading: bool,
}

impl AllLightsUseCase {
    pub fn new(repository: Arc<dyn LightsRepository>) -> Self {
        Self {
            repository,
            emit_loading: true,
        }
    }

    pub fn with_loading(mut self, emit_loading: bool) -> Self {
        self.emit_loading = emit_loading;
        self
    }
}

impl UseCase for AllLightsUseCase {
    type Output = Vec<LightDevice>;

    fn invoke(&self) -> ResourceStream<Vec<LightDevice>> {
        let repository = self.repository.clone();
        resource_flow("device listing", self.emit_loading, move || async move {
            repository.all_lights().await
        })
    }
}
