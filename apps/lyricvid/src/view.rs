//! Terminal rendering of the submit form state.

use shared::domain::UiState;
use tokio::{sync::watch, task::JoinHandle};

/// Line to print for a state transition, if anything changed visibly.
pub fn render(previous: &UiState, current: &UiState) -> Option<String> {
    if current.submitting && !previous.submitting {
        return Some(format!("[{}] waiting for render service", current.submit_label()));
    }
    if !current.submitting {
        if let Some(message) = &current.error_message {
            if previous.error_message.as_ref() != Some(message) || previous.submitting {
                return Some(format!("error: {message}"));
            }
        }
    }
    None
}

/// Prints state changes to stderr until the store is dropped.
pub fn spawn(rx: watch::Receiver<UiState>) -> JoinHandle<()> {
    tokio::spawn(run(rx, |line| eprintln!("{line}")))
}

/// Emits a line for the current state and every later change.
///
/// The baseline is an idle form, so a receiver that first looks after the
/// submission already failed still reports the error.
pub async fn run(mut rx: watch::Receiver<UiState>, mut emit: impl FnMut(String)) {
    let mut previous = UiState::default();
    loop {
        let current = rx.borrow_and_update().clone();
        if let Some(line) = render(&previous, &current) {
            emit(line);
        }
        previous = current;
        if rx.changed().await.is_err() {
            break;
        }
    }
}
