/// Shortest playable duration of a dialogue line, in seconds.
pub const MIN_LINE_DURATION: f64 = 0.3;
pub const MIN_LINE_DURATION_MS: i64 = 300;

/// Longest source accepted for ingestion (10 minutes).
pub const MAX_SOURCE_DURATION_SECS: f64 = 600.0;

pub const STORED_AUDIO_SAMPLE_RATE: u32 = 16000;

pub const SCHEMA_VERSION: &str = "v1";

/// Audio extensions the media fetcher may leave behind, in selection priority.
pub const AUDIO_CANDIDATE_EXTENSIONS: &[&str] = &["mp3", "m4a", "webm", "opus", "ogg", "wav"];

pub const FALLBACK_FEEDBACK: &str = "Good attempt! Keep practicing.";

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const CHAT_MODEL: &str = "gpt-4o-mini";
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";

pub const DEFAULT_MAX_DAILY_CALLS: u32 = 10;
pub const DEFAULT_MAX_PER_MINUTE: u32 = 3;
