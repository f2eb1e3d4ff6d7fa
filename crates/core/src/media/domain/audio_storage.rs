use std::path::Path;

use crate::shared::service_error::ServiceError;

/// Domain interface for persisting a local audio artifact.
pub trait AudioStorage: Send + Sync {
    /// Store the file under a fresh unique key and return that key.
    fn upload(&self, audio_path: &Path) -> Result<String, ServiceError>;
}

/// Fresh object key for an uploaded audio file.
pub fn new_audio_key() -> String {
    format!("audio/{}.mp3", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_keys_are_unique_and_prefixed() {
        let a = new_audio_key();
        let b = new_audio_key();
        assert_ne!(a, b);
        assert!(a.starts_with("audio/"));
        assert!(a.ends_with(".mp3"));
    }
}
