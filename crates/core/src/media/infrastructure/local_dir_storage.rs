use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::media::domain::audio_storage::{new_audio_key, AudioStorage};
use crate::shared::service_error::ServiceError;

/// Audio storage that copies artifacts into a local directory, keyed the same
/// way as the object store. Used for development without a storage backend.
#[derive(Debug)]
pub struct LocalDirStorage {
    root: PathBuf,
}

impl LocalDirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Platform data directory, e.g. `~/.local/share/Kaiwa/storage/` on Linux.
    pub fn default_root() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("Kaiwa").join("storage"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AudioStorage for LocalDirStorage {
    fn upload(&self, audio_path: &Path) -> Result<String, ServiceError> {
        if !audio_path.is_file() {
            return Err(ServiceError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("audio file not found: {}", audio_path.display()),
            )));
        }

        let key = new_audio_key();
        let dest = self.root.join(&key);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(audio_path, &dest)?;
        log::info!("Stored audio at {}", dest.display());
        Ok(key)
    }
}
