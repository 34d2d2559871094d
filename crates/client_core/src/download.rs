//! Delivery of a rendered payload to the local filesystem.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedVideo {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Where a successful submission's payload ends up.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn save(&self, payload: Vec<u8>, filename: &str) -> io::Result<SavedVideo>;
}

/// Saves payloads into a fixed output directory.
///
/// The payload is first written to a temporary file beside the target and then
/// renamed into place, so a partially written video never carries the final
/// name. The temporary file is removed on every path that does not persist it.
#[derive(Debug, Clone)]
pub struct FileDownloadTrigger {
    output_dir: PathBuf,
}

impl FileDownloadTrigger {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl DownloadSink for FileDownloadTrigger {
    async fn save(&self, payload: Vec<u8>, filename: &str) -> io::Result<SavedVideo> {
        let output_dir = self.output_dir.clone();
        let filename = filename.to_string();
        tokio::task::spawn_blocking(move || save_via_transient(&output_dir, &payload, &filename))
            .await
            .map_err(io::Error::other)?
    }
}

/// Short-lived local copy of a payload awaiting its final name.
struct TransientPayload {
    file: NamedTempFile,
    size_bytes: u64,
}

impl TransientPayload {
    fn materialize(dir: &Path, payload: &[u8]) -> io::Result<Self> {
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(payload)?;
        file.as_file().sync_all()?;
        debug!(path = %file.path().display(), bytes = payload.len(), "materialized transient payload");
        Ok(Self {
            file,
            size_bytes: payload.len() as u64,
        })
    }

    /// Moves the payload to `target`. On failure the handle is dropped here,
    /// which deletes the temporary file.
    fn save_as(self, target: &Path) -> io::Result<SavedVideo> {
        let size_bytes = self.size_bytes;
        self.file.persist(target).map_err(|err| err.error)?;
        Ok(SavedVideo {
            path: target.to_path_buf(),
            size_bytes,
        })
    }
}

fn save_via_transient(output_dir: &Path, payload: &[u8], filename: &str) -> io::Result<SavedVideo> {
    if Path::new(filename).file_name().and_then(|name| name.to_str()) != Some(filename) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{filename}' is not a plain file name"),
        ));
    }

    fs::create_dir_all(output_dir)?;
    let transient = TransientPayload::materialize(output_dir, payload)?;
    transient.save_as(&output_dir.join(filename))
}

#[cfg(test)]
#[path = "tests/download_tests.rs"]
mod tests;
