// src/session/controller.rs — Activation / deactivation of one specialist id.
//
// Activation: fetch profile -> write `online` -> publish profile as online.
// Deactivation: detached `offline` write, issued only after the activation
// attempt for the same id has finished. Its failure is logged, never returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{SessionError, SessionState};
use crate::infra::errors::DeskError;
use crate::presence::{PresenceClient, PresenceError, SpecialistProfile, SpecialistStatus};

pub struct SessionController {
    client: Arc<dyn PresenceClient>,
    state: Arc<watch::Sender<SessionState>>,
    active: Option<Activation>,
}

/// One activation of one specialist id.
struct Activation {
    specialist_id: String,
    /// Cleared on deactivation; the task publishes nothing once it is false.
    live: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

/// Handle to a pending offline write. Dropping it detaches the write.
#[must_use = "drop to detach, or call `wait` to block until the offline write finishes"]
pub struct Deactivation {
    handle: Option<JoinHandle<()>>,
}

impl Deactivation {
    fn none() -> Self {
        Self { handle: None }
    }

    /// True when there was nothing to deactivate.
    pub fn is_noop(&self) -> bool {
        self.handle.is_none()
    }

    /// Wait for the offline write to finish. Never fails.
    pub async fn wait(self) {
        if let Some(handle) = self.handle {
            if let Err(e) = handle.await {
                tracing::warn!("Deactivation task did not complete: {}", e);
            }
        }
    }
}

impl SessionController {
    pub fn new(client: Arc<dyn PresenceClient>) -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        Self {
            client,
            state: Arc::new(tx),
            active: None,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Id of the current activation, if any.
    pub fn specialist_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.specialist_id.as_str())
    }

    /// Wait until the current activation is no longer loading.
    ///
    /// A backend call that never returns keeps this pending forever.
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        let settled = rx.wait_for(|s| !s.loading).await.map(|s| s.clone());
        match settled {
            Ok(state) => state,
            Err(_) => self.state(),
        }
    }

    /// Activate `specialist_id`, deactivating any previous id first.
    ///
    /// Setting the id that is already active is a no-op. Returns the handle
    /// for the previous id's offline write. Must be called inside a Tokio
    /// runtime.
    pub fn set_specialist(
        &mut self,
        specialist_id: impl Into<String>,
    ) -> Result<Deactivation, DeskError> {
        let specialist_id = specialist_id.into();
        if specialist_id.trim().is_empty() {
            return Err(DeskError::InvalidSpecialistId);
        }
        if self.specialist_id() == Some(specialist_id.as_str()) {
            return Ok(Deactivation::none());
        }

        let previous = self.deactivate();
        self.state.send_replace(SessionState::loading());

        let live = Arc::new(AtomicBool::new(true));
        tracing::info!("Activating specialist {}", specialist_id);
        let task = tokio::spawn(run_activation(
            self.client.clone(),
            specialist_id.clone(),
            live.clone(),
            self.state.clone(),
        ));

        self.active = Some(Activation {
            specialist_id,
            live,
            task,
        });
        Ok(previous)
    }

    /// End the current activation and send `offline` for its id in the background.
    pub fn deactivate(&mut self) -> Deactivation {
        let Some(activation) = self.active.take() else {
            return Deactivation::none();
        };
        activation.live.store(false, Ordering::SeqCst);
        self.state.send_replace(SessionState::default());

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(rt) => rt,
            Err(_) => {
                tracing::warn!(
                    "No runtime available; specialist {} was not marked offline",
                    activation.specialist_id
                );
                return Deactivation::none();
            }
        };

        tracing::info!("Deactivating specialist {}", activation.specialist_id);
        let client = self.client.clone();
        let handle = runtime.spawn(async move {
            let Activation {
                specialist_id,
                task,
                ..
            } = activation;
            if let Err(e) = task.await {
                tracing::debug!("Activation for {} ended abnormally: {}", specialist_id, e);
            }
            let outcome = client
                .update_specialist_status(&specialist_id, SpecialistStatus::Offline)
                .await;
            log_offline_outcome(&specialist_id, outcome);
        });

        Deactivation {
            handle: Some(handle),
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        // Detached: the offline write outlives the controller.
        drop(self.deactivate());
    }
}

// ── Activation task ──────────────────────────────────────────────

async fn run_activation(
    client: Arc<dyn PresenceClient>,
    specialist_id: String,
    live: Arc<AtomicBool>,
    state: Arc<watch::Sender<SessionState>>,
) {
    let next = match activate(client.as_ref(), &specialist_id, &live).await {
        Ok(profile) => SessionState::ready(profile),
        Err(error) => SessionState::failed(error),
    };

    // The liveness check happens under the channel's write lock, so a
    // concurrent deactivate either sees this publish or suppresses it.
    state.send_if_modified(|current| {
        if !live.load(Ordering::SeqCst) {
            return false;
        }
        *current = next;
        true
    });
}

/// Fetch the profile and bring it online.
///
/// The returned profile always has `status == Online`. If the activation was
/// disposed after the fetch, the online write is skipped and the profile is
/// returned as fetched; nobody will publish it.
pub async fn activate(
    client: &dyn PresenceClient,
    specialist_id: &str,
    live: &AtomicBool,
) -> Result<SpecialistProfile, SessionError> {
    let profile = match client.get_specialist(specialist_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            tracing::warn!("Specialist {} is not registered", specialist_id);
            return Err(SessionError::NotFound);
        }
        Err(e) => {
            tracing::error!("Failed to fetch specialist {}: {}", specialist_id, e);
            return Err(SessionError::Unexpected);
        }
    };

    if !live.load(Ordering::SeqCst) {
        tracing::debug!(
            "Activation for {} disposed before going online",
            specialist_id
        );
        return Ok(profile);
    }

    if let Err(e) = client
        .update_specialist_status(specialist_id, SpecialistStatus::Online)
        .await
    {
        tracing::error!("Failed to mark {} online: {}", specialist_id, e);
        return Err(SessionError::Unexpected);
    }

    Ok(SpecialistProfile {
        status: SpecialistStatus::Online,
        ..profile
    })
}

fn log_offline_outcome(specialist_id: &str, outcome: Result<(), PresenceError>) {
    match outcome {
        Ok(()) => tracing::debug!("Specialist {} marked offline", specialist_id),
        Err(e) => tracing::warn!("Failed to mark {} offline: {}", specialist_id, e),
    }
}
