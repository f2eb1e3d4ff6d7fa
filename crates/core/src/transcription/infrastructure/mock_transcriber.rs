use std::path::Path;

use crate::shared::service_error::ServiceError;
use crate::transcription::domain::transcriber::Transcriber;
use crate::transcription::domain::transcript::{Transcript, TranscriptSegment};

/// Deterministic stand-in used when AI access is disabled.
///
/// Always returns the same short bilingual-practice exchange, regardless of
/// the audio it is given.
#[derive(Debug, Default)]
pub struct MockTranscriber;

impl MockTranscriber {
    pub fn sample_transcript() -> Transcript {
        Transcript {
            text: "こんにちは、元気ですか？ はい、元気です！".to_string(),
            segments: vec![
                TranscriptSegment {
                    id: 0,
                    start: 0.0,
                    end: 2.5,
                    text: "こんにちは、元気ですか？".to_string(),
                },
                TranscriptSegment {
                    id: 1,
                    start: 2.6,
                    end: 4.5,
                    text: "はい、元気です！".to_string(),
                },
            ],
            duration: 4.5,
        }
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, audio_path: &Path) -> Result<Transcript, ServiceError> {
        log::info!("Mock transcription for {}", audio_path.display());
        Ok(Self::sample_transcript())
    }
}
