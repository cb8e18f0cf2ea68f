// ── Configuration session ──
//
// Lifecycle facade over one device's editable settings: a guarded load,
// synchronous edits with derived views, a single-flight save, discard and
// close. Transport and user notifications are injected, so several
// independent sessions can live side by side.
//
// State is never stored directly. It is derived from the flight flags and
// the loaded data after every transition and published on a `watch`
// channel for renderers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use scribe_api::ConfigPatch;

use crate::catalog::PinCatalog;
use crate::convert::settings_from_document;
use crate::error::CoreError;
use crate::model::{DeviceSettings, GpioPin, Role};
use crate::resolver::{self, PinConflict, PinOption};
use crate::tracker::ChangeTracker;
use crate::transport::{ConfigTransport, Notifier, Severity};
use crate::validation::{self, FieldKey, ValidationErrors};

// ── SessionState ─────────────────────────────────────────────────

/// Whether the working copy differs from the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum EditState {
    Clean,
    Dirty,
}

/// Session lifecycle state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unloaded,
    Loading,
    Loaded(EditState),
    Saving,
}

/// Result of a [`ConfigSession::load`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// This call fetched the configuration.
    Loaded,
    /// Already loaded; nothing was fetched.
    AlreadyLoaded,
    /// Another call is fetching right now; this one did nothing.
    InFlight,
}

/// A persisted save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Confirmation text from the device.
    pub message: String,
    /// Exactly what was sent.
    pub patch: ConfigPatch,
}

// ── ConfigSession ────────────────────────────────────────────────

/// One editing session against one device.
///
/// Cheaply cloneable via `Arc<SessionInner>`. All clones share the same
/// baseline, working copy and flight flags.
pub struct ConfigSession<T: ConfigTransport> {
    inner: Arc<SessionInner<T>>,
}

impl<T: ConfigTransport> Clone for ConfigSession<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct SessionInner<T> {
    transport: T,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<SessionState>,
    data: Mutex<Option<Loaded>>,
    loading: AtomicBool,
    saving: AtomicBool,
    closed: CancellationToken,
}

/// Everything that exists only after a successful load.
struct Loaded {
    catalog: Arc<PinCatalog>,
    tracker: ChangeTracker,
    working: DeviceSettings,
    errors: ValidationErrors,
}

impl Loaded {
    fn new(catalog: PinCatalog, baseline: DeviceSettings) -> Self {
        let errors = validation::validate_all(&baseline);
        Self {
            catalog: Arc::new(catalog),
            working: baseline.clone(),
            tracker: ChangeTracker::new(baseline),
            errors,
        }
    }

    fn revalidate(&mut self) {
        self.errors = validation::validate_all(&self.working);
    }

    fn edit_state(&self) -> EditState {
        if self.tracker.has_changes(&self.working) {
            EditState::Dirty
        } else {
            EditState::Clean
        }
    }
}

impl<T: ConfigTransport> SessionInner<T> {
    fn lock(&self) -> MutexGuard<'_, Option<Loaded>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn derive_state(&self) -> SessionState {
        if self.closed.is_cancelled() {
            return SessionState::Unloaded;
        }
        if self.saving.load(Ordering::Acquire) {
            return SessionState::Saving;
        }
        match self.lock().as_ref() {
            Some(loaded) => SessionState::Loaded(loaded.edit_state()),
            None if self.loading.load(Ordering::Acquire) => SessionState::Loading,
            None => SessionState::Unloaded,
        }
    }

    /// Recompute the state and notify watchers if it moved.
    /// Must not be called with the data lock held.
    fn publish_state(&self) {
        let next = self.derive_state();
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            debug!(from = ?*current, to = ?next, "session state");
            *current = next;
            true
        });
    }
}

/// Clears a flight flag on every exit path and republishes the state.
struct FlightGuard<'a, T: ConfigTransport> {
    inner: &'a SessionInner<T>,
    flag: &'a AtomicBool,
}

impl<T: ConfigTransport> Drop for FlightGuard<'_, T> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        self.inner.publish_state();
    }
}

impl<T: ConfigTransport> ConfigSession<T> {
    /// Create an unloaded session. Nothing is fetched until
    /// [`load()`](Self::load).
    pub fn new(transport: T, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(SessionState::Unloaded);
        Self {
            inner: Arc::new(SessionInner {
                transport,
                notifier,
                state,
                data: Mutex::new(None),
                loading: AtomicBool::new(false),
                saving: AtomicBool::new(false),
                closed: CancellationToken::new(),
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Fetch the configuration and build the catalog and baseline.
    ///
    /// Runs at most once: calls made while a load is in flight or after a
    /// successful one are no-ops. A failed load leaves the session
    /// `Unloaded` so the caller can retry.
    pub async fn load(&self) -> Result<LoadOutcome, CoreError> {
        let inner = &*self.inner;
        if inner.closed.is_cancelled() {
            return Err(CoreError::SessionClosed);
        }
        if inner.lock().is_some() {
            return Ok(LoadOutcome::AlreadyLoaded);
        }
        if inner.loading.swap(true, Ordering::AcqRel) {
            return Ok(LoadOutcome::InFlight);
        }
        let _guard = FlightGuard {
            inner,
            flag: &inner.loading,
        };
        inner.publish_state();

        let fetched = tokio::select! {
            biased;
            () = inner.closed.cancelled() => return Err(CoreError::SessionClosed),
            doc = inner.transport.load_configuration() => doc,
        };

        let (catalog, baseline) = match fetched.and_then(|doc| settings_from_document(&doc)) {
            Ok(parts) => parts,
            Err(e) => {
                let message = e.detail();
                warn!(error = %message, "configuration load failed");
                inner.notifier.show_message(
                    &format!("Failed to load device configuration: {message}"),
                    Severity::Error,
                );
                return Err(CoreError::Load { message });
            }
        };

        let found = resolver::conflicts(&baseline.assignment);
        let pins = catalog.len();
        {
            // A close that raced the reply must win: check and store under one lock.
            let mut data = inner.lock();
            if inner.closed.is_cancelled() {
                debug!("session closed while loading; dropping reply");
                return Err(CoreError::SessionClosed);
            }
            *data = Some(Loaded::new(catalog, baseline));
        }

        for PinConflict { pin, roles } in found {
            let holders: Vec<&str> = roles.iter().map(|r| r.label()).collect();
            let text = format!("{pin} is assigned to more than one role: {}", holders.join(", "));
            warn!(%pin, ?roles, "double pin assignment in device configuration");
            inner.notifier.show_message(&text, Severity::Warning);
        }

        info!(pins, "configuration loaded");
        Ok(LoadOutcome::Loaded)
    }

    /// Submit the minimal patch for the current edits.
    ///
    /// At most one save runs at a time; a second call while one is in
    /// flight fails with [`CoreError::SaveInFlight`]. On failure the working
    /// copy is left untouched and the session stays dirty.
    pub async fn save(&self) -> Result<SaveOutcome, CoreError> {
        let inner = &*self.inner;
        if inner.closed.is_cancelled() {
            return Err(CoreError::SessionClosed);
        }
        if inner.saving.swap(true, Ordering::AcqRel) {
            return Err(CoreError::SaveInFlight);
        }
        let _guard = FlightGuard {
            inner,
            flag: &inner.saving,
        };

        let prepared = {
            let data = inner.lock();
            match data.as_ref() {
                None => Err(CoreError::NotLoaded),
                Some(loaded) if !loaded.errors.is_empty() => Err(CoreError::Invalid {
                    errors: loaded.errors.clone(),
                }),
                Some(loaded) => {
                    let patch = loaded.tracker.diff(&loaded.working);
                    if patch.is_empty() {
                        Err(CoreError::NothingToSave)
                    } else {
                        Ok(patch)
                    }
                }
            }
        };
        let patch = match prepared {
            Ok(patch) => patch,
            Err(e @ CoreError::Invalid { .. }) => {
                inner
                    .notifier
                    .show_message("Please fix the highlighted errors before saving", Severity::Warning);
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        inner.publish_state();
        debug!(?patch, "saving configuration");

        let sent = tokio::select! {
            biased;
            () = inner.closed.cancelled() => return Err(CoreError::SessionClosed),
            reply = inner.transport.save_configuration(&patch) => reply,
        };

        match sent {
            Ok(message) => {
                {
                    let mut data = inner.lock();
                    let Some(loaded) = data.as_mut().filter(|_| !inner.closed.is_cancelled())
                    else {
                        return Err(CoreError::SessionClosed);
                    };
                    loaded.tracker.commit(&patch);
                }
                info!("configuration saved");
                inner.notifier.show_message(&message, Severity::Success);
                Ok(SaveOutcome { message, patch })
            }
            Err(e) => {
                let message = e.detail();
                warn!(error = %message, "configuration save failed");
                inner.notifier.show_message(
                    &format!("Failed to save device settings: {message}"),
                    Severity::Error,
                );
                Err(CoreError::Save { message })
            }
        }
    }

    /// Throw away every edit and return to the baseline.
    pub fn discard(&self) -> Result<(), CoreError> {
        self.edit(|working, baseline| working.clone_from(baseline))
    }

    /// Tear the session down. In-flight loads and saves are abandoned and
    /// their late completions are ignored.
    pub fn close(&self) {
        self.inner.closed.cancel();
        *self.inner.lock() = None;
        self.inner.publish_state();
    }

    // ── Editing ──────────────────────────────────────────────────

    /// Apply `f` to the working copy (with the baseline for reference),
    /// then revalidate every field.
    fn edit<R>(
        &self,
        f: impl FnOnce(&mut DeviceSettings, &DeviceSettings) -> R,
    ) -> Result<R, CoreError> {
        let out = {
            let mut data = self.inner.lock();
            let loaded = data.as_mut().ok_or(CoreError::NotLoaded)?;
            let out = f(&mut loaded.working, loaded.tracker.baseline());
            loaded.revalidate();
            out
        };
        self.inner.publish_state();
        Ok(out)
    }

    pub fn set_owner(&self, owner: impl Into<String>) -> Result<(), CoreError> {
        let owner = owner.into();
        self.edit(|working, _| working.owner = owner)
    }

    pub fn set_timezone(&self, timezone: impl Into<String>) -> Result<(), CoreError> {
        let timezone = timezone.into();
        self.edit(|working, _| working.timezone = timezone)
    }

    /// Bind `role` to `pin` (`None` or the sentinel to disconnect).
    ///
    /// The pin must exist in the catalog. Unsafe or already-used pins are
    /// accepted; they surface through [`options_for`](Self::options_for)
    /// and validation instead.
    pub fn assign(&self, role: Role, pin: Option<GpioPin>) -> Result<(), CoreError> {
        let pin = GpioPin::normalize(pin);
        match pin {
            None if !role.allows_unassigned() => {
                return Err(CoreError::PinRequired { role: role.label() });
            }
            Some(p) if !self.catalog()?.contains(p) => {
                return Err(CoreError::UnknownPin { pin: p.number() });
            }
            _ => {}
        }
        self.edit(|working, _| working.assignment.set(role, pin))
    }

    // ── Derived views ────────────────────────────────────────────

    fn with_loaded<R>(&self, f: impl FnOnce(&Loaded) -> R) -> Result<R, CoreError> {
        self.inner.lock().as_ref().map(f).ok_or(CoreError::NotLoaded)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn catalog(&self) -> Result<Arc<PinCatalog>, CoreError> {
        self.with_loaded(|l| Arc::clone(&l.catalog))
    }

    pub fn working_copy(&self) -> Result<DeviceSettings, CoreError> {
        self.with_loaded(|l| l.working.clone())
    }

    pub fn baseline(&self) -> Result<DeviceSettings, CoreError> {
        self.with_loaded(|l| l.tracker.baseline().clone())
    }

    /// Annotated options for `role`, recomputed from the working copy.
    pub fn options_for(&self, role: Role) -> Result<Vec<PinOption>, CoreError> {
        self.with_loaded(|l| resolver::options_for(&l.catalog, role, &l.working.assignment))
    }

    pub fn conflicts(&self) -> Result<Vec<PinConflict>, CoreError> {
        self.with_loaded(|l| resolver::conflicts(&l.working.assignment))
    }

    /// Empty when nothing is loaded.
    pub fn validation_errors(&self) -> ValidationErrors {
        self.with_loaded(|l| l.errors.clone()).unwrap_or_default()
    }

    pub fn has_changes(&self) -> bool {
        self.with_loaded(|l| l.tracker.has_changes(&l.working))
            .unwrap_or(false)
    }

    pub fn changed_fields(&self) -> Vec<FieldKey> {
        self.with_loaded(|l| l.tracker.changed_fields(&l.working))
            .unwrap_or_default()
    }

    pub fn diff_payload(&self) -> ConfigPatch {
        self.with_loaded(|l| l.tracker.diff(&l.working))
            .unwrap_or_default()
    }

    /// Loaded, dirty, valid, and no save in flight.
    pub fn can_save(&self) -> bool {
        if self.inner.closed.is_cancelled() || self.inner.saving.load(Ordering::Acquire) {
            return false;
        }
        self.with_loaded(|l| l.errors.is_empty() && l.tracker.has_changes(&l.working))
            .unwrap_or(false)
    }
}
