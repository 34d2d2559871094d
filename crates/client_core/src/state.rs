//! Observable UI state for the submit form.

use shared::domain::UiState;
use tokio::sync::watch;

/// Single-writer holder of [`UiState`].
///
/// The submission controller drives the transitions; views call
/// [`UiStateStore::subscribe`] and re-render whenever the receiver reports a
/// change.
#[derive(Debug)]
pub struct UiStateStore {
    tx: watch::Sender<UiState>,
}

impl Default for UiStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UiStateStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(UiState::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> UiState {
        self.tx.borrow().clone()
    }

    /// Clears the previous error and marks a submission in flight.
    ///
    /// Returns `false` without touching the state when another submission is
    /// already in flight. The check and the update happen under one lock.
    pub(crate) fn try_begin_submission(&self) -> bool {
        self.tx.send_if_modified(|state| {
            if !state.can_submit() {
                return false;
            }
            state.submitting = true;
            state.error_message = None;
            true
        })
    }

    pub(crate) fn record_failure(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx.send_modify(|state| state.error_message = Some(message));
    }

    pub(crate) fn finish_submission(&self) {
        self.tx.send_if_modified(|state| {
            let was_submitting = state.submitting;
            state.submitting = false;
            was_submitting
        });
    }
}
