use serde::{Deserialize, Serialize};

/// Path of the render endpoint, relative to the service base URL.
pub const CREATE_VIDEO_PATH: &str = "/create_video";

/// Filename the rendered video is saved under.
pub const OUTPUT_FILENAME: &str = "lyrics_video.mp4";

/// Message used when a failure response carries no readable `error` field.
pub const GENERIC_SERVER_ERROR: &str = "Server error";

/// Body of `POST /create_video`. Locators are forwarded exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVideoRequest {
    pub image_url: String,
    pub audio_url: String,
    pub lyrics_url: String,
}

impl CreateVideoRequest {
    pub fn new(
        image_url: impl Into<String>,
        audio_url: impl Into<String>,
        lyrics_url: impl Into<String>,
    ) -> Self {
        Self {
            image_url: image_url.into(),
            audio_url: audio_url.into(),
            lyrics_url: lyrics_url.into(),
        }
    }
}

/// JSON body the render service returns alongside a non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
        }
    }

    /// Reads the displayable message out of a raw failure body.
    ///
    /// Any JSON value is accepted; a missing, empty or non-string `error`
    /// yields [`GENERIC_SERVER_ERROR`]. Bodies that are not JSON at all are
    /// reported as a parse error.
    pub fn message_from_bytes(body: &[u8]) -> Result<String, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        Ok(value
            .get("error")
            .and_then(serde_json::Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string()))
    }
}
