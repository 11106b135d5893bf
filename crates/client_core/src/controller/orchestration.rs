//! Dispatches UI actions to a data source and publishes the resulting load state.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    controller::{
        events::{failure_message, Action},
        reducer::{reduce, LoadEvent, ViewState},
    },
    repository::DataSource,
};

/// Owns the observable load state of one screen.
///
/// State is published through a `watch` channel: the coordinator is the only
/// writer, readers get consistent snapshots via [`state`](Self::state) or
/// [`subscribe`](Self::subscribe).
pub struct LoadCoordinator<S: DataSource> {
    shared: Arc<Shared<S>>,
    runtime: Handle,
}

struct Shared<S: DataSource> {
    source: S,
    subject: String,
    state: watch::Sender<ViewState<S::Item>>,
    cancel: Mutex<CancellationToken>,
}

impl<S: DataSource> LoadCoordinator<S> {
    /// Creates a coordinator that spawns loads on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime; use
    /// [`with_runtime`](Self::with_runtime) from other threads.
    pub fn new(source: S, subject: impl Into<String>) -> Self {
        Self::with_runtime(source, subject, Handle::current())
    }

    pub fn with_runtime(source: S, subject: impl Into<String>, runtime: Handle) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            shared: Arc::new(Shared {
                source,
                subject: subject.into(),
                state,
                cancel: Mutex::new(CancellationToken::new()),
            }),
            runtime,
        }
    }

    /// Applies `action`. The transition to `Loading` is visible before this returns;
    /// the load itself runs on a spawned task, whose handle is returned.
    /// Returns `None` when the action was a no-op.
    pub fn send(&self, action: Action) -> Option<JoinHandle<()>> {
        // Held across the transition and the token read: `cancel()` sees both or neither.
        let cancel_slot = self.shared.cancel.lock();
        let Some(generation) = self.shared.apply(action.into_event()) else {
            debug!(action = action.name(), subject = %self.shared.subject, "load: action ignored");
            return None;
        };
        let cancel = cancel_slot.clone();
        drop(cancel_slot);

        info!(
            action = action.name(),
            subject = %self.shared.subject,
            generation,
            "load: started"
        );

        let shared = self.shared.clone();
        Some(
            self.runtime
                .spawn(async move { shared.run_load(generation, cancel).await }),
        )
    }

    pub fn state(&self) -> ViewState<S::Item> {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<S::Item>> {
        self.shared.state.subscribe()
    }

    /// Cancels loads in flight. They finish as `Failed`; later loads are unaffected.
    pub fn cancel(&self) {
        let mut slot = self.shared.cancel.lock();
        slot.cancel();
        *slot = CancellationToken::new();
    }

    pub fn source(&self) -> &S {
        &self.shared.source
    }
}

impl<S: DataSource> Drop for LoadCoordinator<S> {
    fn drop(&mut self) {
        self.shared.cancel.lock().cancel();
    }
}

impl<S: DataSource> Shared<S> {
    /// Applies `event` atomically. Returns the resulting generation when the state changed.
    fn apply(&self, event: LoadEvent<S::Item>) -> Option<u64> {
        let mut applied = None;
        self.state.send_if_modified(|current| match reduce(current, event) {
            Some(next) => {
                applied = Some(next.generation());
                *current = next;
                true
            }
            None => false,
        });
        applied
    }

    async fn run_load(&self, generation: u64, cancel: CancellationToken) {
        let event = match self.source.fetch_data(&cancel).await {
            Ok(items) => {
                info!(
                    subject = %self.subject,
                    generation,
                    count = items.len(),
                    "load: succeeded"
                );
                LoadEvent::Succeeded { generation, items }
            }
            Err(err) => {
                warn!(subject = %self.subject, generation, error = %err, "load: failed");
                LoadEvent::Failed {
                    generation,
                    message: failure_message(&self.subject, &err),
                }
            }
        };

        if self.apply(event).is_none() {
            debug!(
                subject = %self.subject,
                generation,
                "load: discarding completion superseded by a newer load"
            );
        }
    }
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
