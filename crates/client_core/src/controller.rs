//! One render submission, from request to saved file or error message.

use std::sync::Arc;

use shared::{
    domain::SubmissionOutcome,
    error::SubmissionError,
    protocol::{CreateVideoRequest, OUTPUT_FILENAME},
};
use tracing::{error, info, warn};

use crate::{
    download::{DownloadSink, SavedVideo},
    state::UiStateStore,
    RenderService,
};

/// Drives render submissions and writes their progress into a [`UiStateStore`].
pub struct SubmissionController<S, D> {
    service: S,
    sink: D,
    state: Arc<UiStateStore>,
}

impl<S: RenderService, D: DownloadSink> SubmissionController<S, D> {
    pub fn new(service: S, sink: D, state: Arc<UiStateStore>) -> Self {
        Self {
            service,
            sink,
            state,
        }
    }

    pub fn state(&self) -> &Arc<UiStateStore> {
        &self.state
    }

    /// Runs one submission to completion.
    ///
    /// Issues exactly one render request unless another submission is already
    /// in flight, in which case it returns
    /// [`SubmissionError::AlreadySubmitting`] without sending anything and
    /// without touching the in-flight submission's state. Every failure is
    /// also written to the UI state as a displayable message, and the
    /// submitting flag is cleared on every exit path, including when the
    /// returned future is dropped early.
    pub async fn submit(&self, request: CreateVideoRequest) -> Result<SavedVideo, SubmissionError> {
        let Some(_in_flight) = InFlight::admit(&self.state) else {
            warn!("rejected submission while another is in flight");
            return Err(SubmissionError::AlreadySubmitting);
        };

        info!(
            image_url = %request.image_url,
            audio_url = %request.audio_url,
            lyrics_url = %request.lyrics_url,
            "submitting render request"
        );

        let outcome = self.request_render(&request).await;
        let result = self.deliver(outcome).await;
        if let Err(err) = &result {
            self.state.record_failure(err.to_string());
        }
        result
    }

    async fn request_render(&self, request: &CreateVideoRequest) -> SubmissionOutcome {
        match self.service.create_video(request).await {
            Ok(payload) => SubmissionOutcome::Success {
                payload,
                filename: OUTPUT_FILENAME.to_string(),
            },
            Err(err) => {
                match &err {
                    SubmissionError::Service { status, message } => {
                        warn!(status, %message, "render service rejected submission");
                    }
                    other => error!(error = %other, "render request failed"),
                }
                SubmissionOutcome::Failure(err)
            }
        }
    }

    async fn deliver(&self, outcome: SubmissionOutcome) -> Result<SavedVideo, SubmissionError> {
        match outcome {
            SubmissionOutcome::Success { payload, filename } => {
                match self.sink.save(payload, &filename).await {
                    Ok(saved) => {
                        info!(
                            path = %saved.path.display(),
                            bytes = saved.size_bytes,
                            "saved rendered video"
                        );
                        Ok(saved)
                    }
                    Err(err) => {
                        error!(%filename, error = %err, "failed to save rendered video");
                        Err(SubmissionError::Save {
                            filename,
                            reason: err.to_string(),
                        })
                    }
                }
            }
            SubmissionOutcome::Failure(err) => Err(err),
        }
    }
}

/// Admission slot for a submission; clears `submitting` when dropped.
struct InFlight<'a> {
    state: &'a UiStateStore,
}

impl<'a> InFlight<'a> {
    fn admit(state: &'a UiStateStore) -> Option<Self> {
        state.try_begin_submission().then(|| Self { state })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.finish_submission();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
