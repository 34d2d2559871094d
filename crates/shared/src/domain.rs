use crate::error::SubmissionError;

/// View-facing state for the submit form.
///
/// Only the submission controller changes this; views read snapshots of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub submitting: bool,
    pub error_message: Option<String>,
}

impl UiState {
    /// Label of the submit control for the current state.
    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Rendering…"
        } else {
            "Create Video"
        }
    }

    /// Submitting again is only offered while nothing is in flight.
    pub fn can_submit(&self) -> bool {
        !self.submitting
    }
}

/// Interpreted response of exactly one submission, before delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success { payload: Vec<u8>, filename: String },
    Failure(SubmissionError),
}
