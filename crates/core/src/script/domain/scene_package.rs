use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::constants::STORED_AUDIO_SAMPLE_RATE;
use crate::shared::record_metadata::RecordMetadata;

use super::dialogue_line::DialogueLine;

/// Target language of every script. Only Japanese is supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "ja")]
    Japanese,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Youtube,
    Url,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub url: String,
}

impl SourceDescriptor {
    pub fn from_url(url: &str) -> Self {
        let kind = if is_youtube_host(url) {
            SourceKind::Youtube
        } else {
            SourceKind::Url
        };
        Self {
            kind,
            url: url.to_string(),
        }
    }
}

/// Unparseable locators are never treated as YouTube.
fn is_youtube_host(url: &str) -> bool {
    let Some(host) = reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    else {
        return false;
    };
    let host = host.trim_end_matches('.');
    host == "youtu.be" || host == "youtube.com" || host.ends_with(".youtube.com")
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioDescriptor {
    pub storage_path: String,
    pub duration: f64,
    pub sample_rate: u32,
}

impl AudioDescriptor {
    pub fn stored(storage_path: String, duration: f64) -> Self {
        Self {
            storage_path,
            duration,
            sample_rate: STORED_AUDIO_SAMPLE_RATE,
        }
    }
}

/// The complete output of one ingestion run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePackage {
    pub scene_id: String,
    pub language: Language,
    pub source: SourceDescriptor,
    pub audio: AudioDescriptor,
    pub script: Vec<DialogueLine>,
    pub metadata: RecordMetadata,
}

impl ScenePackage {
    /// Assemble a package under a freshly generated scene id.
    pub fn new(source: SourceDescriptor, audio: AudioDescriptor, script: Vec<DialogueLine>) -> Self {
        Self {
            scene_id: Uuid::new_v4().to_string(),
            language: Language::Japanese,
            source,
            audio,
            script,
            metadata: RecordMetadata::now(),
        }
    }

    pub fn line(&self, line_id: &str) -> Option<&DialogueLine> {
        self.script.iter().find(|line| line.id == line_id)
    }
}
