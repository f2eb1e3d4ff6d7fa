use serde::{Deserialize, Serialize};

/// One timed span of recognized speech.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    #[serde(default)]
    pub id: u32,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl TranscriptSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Output of a transcription service: full text, ordered segments and the
/// duration of the transcribed media in seconds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
    #[serde(default)]
    pub duration: f64,
}

impl Transcript {
    pub fn exceeds(&self, max_duration_secs: f64) -> bool {
        self.duration > max_duration_secs
    }
}
