use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::shared::constants::TRANSCRIPTION_MODEL;
use crate::shared::openai_client::OpenAiClient;
use crate::shared::service_error::ServiceError;
use crate::transcription::domain::transcriber::Transcriber;
use crate::transcription::domain::transcript::Transcript;

const SERVICE: &str = "whisper";

/// Transcriber backed by the hosted Whisper API (`verbose_json` output, so
/// segment timestamps and media duration come back with the text).
pub struct WhisperApiTranscriber {
    client: Arc<OpenAiClient>,
}

impl WhisperApiTranscriber {
    pub fn new(client: Arc<OpenAiClient>) -> Self {
        Self { client }
    }
}

impl Transcriber for WhisperApiTranscriber {
    fn transcribe(&self, audio_path: &Path) -> Result<Transcript, ServiceError> {
        if !audio_path.is_file() {
            return Err(ServiceError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("audio file not found: {}", audio_path.display()),
            )));
        }

        let transcript: Transcript =
            self.client
                .transcribe_file(SERVICE, audio_path, TRANSCRIPTION_MODEL)?;
        log::info!(
            "Transcribed {} ({} segments, {:.1}s)",
            audio_path.display(),
            transcript.segments.len(),
            transcript.duration
        );
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::rate_limiter::RateLimiter;

    #[test]
    fn test_missing_file_is_io_error() {
        let client = OpenAiClient::new(
            "sk-test",
            "http://127.0.0.1:9",
            Arc::new(RateLimiter::default()),
        );
        let transcriber = WhisperApiTranscriber::new(Arc::new(client));
        let err = transcriber
            .transcribe(Path::new("/nonexistent/audio.mp3"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)));
        assert!(err.to_string().contains("not found"));
    }
}
