use std::error::Error as StdError;

use thiserror::Error;

/// Everything that can end a submission without a saved video.
///
/// The `Display` text is what the view shows as the error message, so each
/// variant renders as a plain sentence with no prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The render service answered with a non-2xx status.
    #[error("{message}")]
    Service { status: u16, message: String },
    /// Sending the request or reading the response failed.
    #[error("{0}")]
    Transport(String),
    /// The payload arrived but could not be written to disk.
    #[error("failed to save {filename}: {reason}")]
    Save { filename: String, reason: String },
    #[error("a submission is already in progress")]
    AlreadySubmitting,
}

impl SubmissionError {
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// Flattens `err` and its `source()` chain into one `": "`-joined message.
    pub fn transport(err: impl StdError) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !text.is_empty() && !message.ends_with(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        Self::Transport(message)
    }
}
