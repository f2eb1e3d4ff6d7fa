use std::path::Path;

use crate::shared::service_error::ServiceError;

use super::transcript::Transcript;

/// Domain interface for speech-to-text transcription of an audio file.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, audio_path: &Path) -> Result<Transcript, ServiceError>;
}
