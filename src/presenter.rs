//! Presenters bind a use case to a single observable screen status.
//!
//! A [`Presenter`] owns a cancellation scope. Every launch collects one
//! invocation's [`Resource`] stream inside that scope and publishes each state
//! as a [`StatusUpdate`] into a [`StatusCell`]. The cell replays its latest value
//! to late observers, so one-time effects go through a [`SuccessLatch`].

use crate::device::LightDevice;
use crate::resource::{Resource, Status};
use crate::usecase::{AllLightsUseCase, LoginUseCase, UseCase};
use futures_util::{Stream, StreamExt};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;

/// One status value tagged with the invocation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub invocation: u64,
    pub status: Status,
}

/// Observable single value with last-value replay.
#[derive(Clone)]
pub struct StatusCell {
    tx: Arc<watch::Sender<Option<StatusUpdate>>>,
}

impl StatusCell {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Stores `update` and notifies observers, even if the value is unchanged.
    pub fn set(&self, update: StatusUpdate) {
        self.tx.send_replace(Some(update));
    }

    /// Stores `update` unless the cell already holds a value from a newer
    /// invocation. Returns whether the update was stored.
    pub fn offer(&self, update: StatusUpdate) -> bool {
        self.tx.send_if_modified(|current| match current {
            Some(existing) if existing.invocation > update.invocation => false,
            _ => {
                *current = Some(update);
                true
            }
        })
    }

    pub fn current(&self) -> Option<StatusUpdate> {
        *self.tx.borrow()
    }

    pub fn status(&self) -> Option<Status> {
        self.current().map(|u| u.status)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<StatusUpdate>> {
        self.tx.subscribe()
    }

    /// The latest value (if any) followed by every later change.
    pub fn updates(&self) -> impl Stream<Item = StatusUpdate> + Send + 'static {
        WatchStream::new(self.subscribe()).filter_map(|update| async move { update })
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Admits each successful invocation once.
#[derive(Debug, Default)]
pub struct SuccessLatch {
    last_fired: Mutex<Option<u64>>,
}

impl SuccessLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time a `Success` of a newer invocation is seen.
    pub fn should_fire(&self, update: &StatusUpdate) -> bool {
        if update.status != Status::Success {
            return false;
        }
        let mut last = self.last_fired.lock();
        match *last {
            Some(fired) if fired >= update.invocation => false,
            _ => {
                *last = Some(update.invocation);
                true
            }
        }
    }
}

/// Lifecycle-bound driver shared by the screen presenters.
pub struct Presenter {
    name: &'static str,
    status: StatusCell,
    scope: CancellationToken,
    invocations: AtomicU64,
}

impl Presenter {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            status: StatusCell::new(),
            scope: CancellationToken::new(),
            invocations: AtomicU64::new(0),
        }
    }

    pub fn status(&self) -> &StatusCell {
        &self.status
    }

    pub fn is_cancelled(&self) -> bool {
        self.scope.is_cancelled()
    }

    /// Ends the scope. Pending launches stop publishing; remote calls already in
    /// flight are not interrupted.
    pub fn cancel(&self) {
        if !self.scope.is_cancelled() {
            debug!("{}: scope cancelled", self.name);
            self.scope.cancel();
        }
    }

    /// Starts a new invocation of `use_case` inside this presenter's scope.
    ///
    /// Once a newer invocation has published, updates from older ones are
    /// discarded. Launching on a cancelled presenter does nothing.
    pub fn launch<U>(&self, use_case: Arc<U>, start_delay: Duration) -> JoinHandle<()>
    where
        U: UseCase + ?Sized + 'static,
    {
        self.launch_with(use_case, start_delay, |_| {})
    }

    /// Like [`launch`](Self::launch), additionally handing every resource to `inspect`
    /// before its status is published.
    ///
    /// Must be called within a Tokio runtime.
    pub fn launch_with<U, F>(
        &self,
        use_case: Arc<U>,
        start_delay: Duration,
        mut inspect: F,
    ) -> JoinHandle<()>
    where
        U: UseCase + ?Sized + 'static,
        F: FnMut(&Resource<U::Output>) + Send + 'static,
    {
        let invocation = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;
        let name = self.name;
        let status = self.status.clone();
        let scope = self.scope.clone();

        tokio::spawn(async move {
            let run = async {
                if !start_delay.is_zero() {
                    tokio::time::sleep(start_delay).await;
                }
                debug!("{}: starting invocation {}", name, invocation);

                let mut stream = use_case.invoke();
                while let Some(resource) = stream.next().await {
                    if scope.is_cancelled() {
                        break;
                    }
                    match &resource {
                        Resource::Loading => debug!("{}: invocation {} loading", name, invocation),
                        Resource::Success(_) => {
                            info!("{}: invocation {} succeeded", name, invocation)
                        }
                        Resource::Error(msg) => {
                            warn!("{}: invocation {} failed: {}", name, invocation, msg)
                        }
                    }
                    inspect(&resource);
                    let update = StatusUpdate {
                        invocation,
                        status: resource.status(),
                    };
                    if !status.offer(update) {
                        debug!("{}: dropping stale update from invocation {}", name, invocation);
                    }
                }
            };

            tokio::select! {
                biased;
                _ = scope.cancelled() => {
                    debug!("{}: abandoning invocation {}", name, invocation);
                }
                _ = run => {}
            }
        })
    }

    /// Runs `effect` once per successful invocation observed by this binding.
    pub fn on_success<F>(&self, effect: F) -> JoinHandle<()>
    where
        F: FnMut(u64) + Send + 'static,
    {
        self.on_success_latched(Arc::new(SuccessLatch::new()), effect)
    }

    /// Like [`on_success`](Self::on_success) with a caller-owned latch, so that
    /// re-binding after a success does not repeat the effect.
    pub fn on_success_latched<F>(&self, latch: Arc<SuccessLatch>, mut effect: F) -> JoinHandle<()>
    where
        F: FnMut(u64) + Send + 'static,
    {
        let mut rx = self.status.subscribe();
        let scope = self.scope.clone();

        tokio::spawn(async move {
            loop {
                if scope.is_cancelled() {
                    break;
                }
                let current = *rx.borrow_and_update();
                if let Some(update) = current {
                    if latch.should_fire(&update) {
                        effect(update.invocation);
                    }
                }

                tokio::select! {
                    biased;
                    _ = scope.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
        })
    }
}

impl Drop for Presenter {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

define_labeled_enum! {
    /// Screens reachable from a presenter.
    pub enum Destination {
        Login => "Login",
        Lights => "Lights",
    }
}

/// Performs screen transitions on behalf of a presenter.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: Destination);
}

/// Login screen: signs in on construction and navigates to the lights screen
/// once per successful sign-in.
pub struct LoginPresenter {
    presenter: Presenter,
    use_case: Arc<LoginUseCase>,
    navigation: Arc<SuccessLatch>,
}

impl LoginPresenter {
    /// Starts the first sign-in immediately. Must be called within a Tokio runtime.
    pub fn new(use_case: Arc<LoginUseCase>) -> Self {
        let presenter = Self {
            presenter: Presenter::new("login"),
            use_case,
            navigation: Arc::new(SuccessLatch::new()),
        };
        presenter.login();
        presenter
    }

    /// Starts another sign-in attempt.
    pub fn login(&self) -> JoinHandle<()> {
        self.presenter.launch(self.use_case.clone(), Duration::ZERO)
    }

    pub fn status(&self) -> &StatusCell {
        self.presenter.status()
    }

    pub fn bind_navigation(&self, navigator: Arc<dyn Navigator>) -> JoinHandle<()> {
        self.presenter
            .on_success_latched(self.navigation.clone(), move |invocation| {
                info!("login: navigating to lights after invocation {}", invocation);
                navigator.navigate(Destination::Lights);
            })
    }

    pub fn cancel(&self) {
        self.presenter.cancel();
    }
}

/// Lights screen: fetches the device list after a start delay and keeps the
/// latest snapshot.
pub struct LightsPresenter {
    presenter: Presenter,
    use_case: Arc<AllLightsUseCase>,
    devices: Arc<RwLock<Vec<LightDevice>>>,
}

impl LightsPresenter {
    /// Schedules the first fetch after `start_delay`. Must be called within a Tokio runtime.
    pub fn new(use_case: Arc<AllLightsUseCase>, start_delay: Duration) -> Self {
        let presenter = Self {
            presenter: Presenter::new("lights"),
            use_case,
            devices: Arc::new(RwLock::new(Vec::new())),
        };
        presenter.fetch(start_delay);
        presenter
    }

    /// Fetches the device list again, immediately.
    pub fn refresh(&self) -> JoinHandle<()> {
        self.fetch(Duration::ZERO)
    }

    fn fetch(&self, delay: Duration) -> JoinHandle<()> {
        let devices = self.devices.clone();
        self.presenter
            .launch_with(self.use_case.clone(), delay, move |resource| match resource {
                Resource::Success(list) => {
                    for device in list {
                        debug!(
                            "lights: {} ({}) properties={:?}",
                            device.dsn,
                            device.product_name.as_deref().unwrap_or("unnamed"),
                            device.managed_properties()
                        );
                    }
                    *devices.write() = list.clone();
                }
                Resource::Loading | Resource::Error(_) => {}
            })
    }

    pub fn status(&self) -> &StatusCell {
        self.presenter.status()
    }

    /// Latest successfully fetched snapshot.
    pub fn devices(&self) -> Vec<LightDevice> {
        self.devices.read().clone()
    }

    pub fn cancel(&self) {
        self.presenter.cancel();
    }
}
