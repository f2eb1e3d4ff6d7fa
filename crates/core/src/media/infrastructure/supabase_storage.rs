use std::fs;
use std::io;
use std::path::Path;

use reqwest::blocking::Client;

use crate::media::domain::audio_storage::{new_audio_key, AudioStorage};
use crate::shared::service_error::ServiceError;
use crate::shared::settings::SupabaseSettings;

const SERVICE: &str = "supabase storage";

/// Audio storage backed by a Supabase storage bucket.
pub struct SupabaseStorage {
    http: Client,
    base_url: String,
    service_role_key: String,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(settings: &SupabaseSettings) -> Self {
        Self {
            http: Client::new(),
            base_url: settings.url.trim_end_matches('/').to_string(),
            service_role_key: settings.service_role_key.clone(),
            bucket: settings.bucket.clone(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key)
    }
}

impl AudioStorage for SupabaseStorage {
    fn upload(&self, audio_path: &Path) -> Result<String, ServiceError> {
        if !audio_path.is_file() {
            return Err(ServiceError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("audio file not found: {}", audio_path.display()),
            )));
        }

        let key = new_audio_key();
        let body = fs::read(audio_path)?;
        let response = self
            .http
            .post(self.object_url(&key))
            .bearer_auth(&self.service_role_key)
            .header("apikey", &self.service_role_key)
            .header(reqwest::header::CONTENT_TYPE, "audio/mpeg")
            .body(body)
            .send()
            .map_err(ServiceError::request(SERVICE))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Server {
                service: SERVICE,
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        log::info!("Uploaded audio to {}/{key}", self.bucket);
        Ok(key)
    }
}
