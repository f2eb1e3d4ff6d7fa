use std::path::Path;
use std::sync::Arc;

use reqwest::blocking::{multipart, Client};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::rate_limiter::RateLimiter;
use super::service_error::ServiceError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: &'static str,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Blocking client for the OpenAI HTTP API.
///
/// Every paid call is admitted through the shared `RateLimiter` first, so the
/// budget holds across all adapters built from the same limiter.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
    limiter: Arc<RateLimiter>,
}

impl OpenAiClient {
    pub fn new(api_key: &str, base_url: &str, limiter: Arc<RateLimiter>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a chat completion and return the first choice's content, if any.
    pub fn chat(
        &self,
        service: &'static str,
        request: &ChatRequest,
    ) -> Result<Option<String>, ServiceError> {
        self.limiter.admit(service)?;

        let url = format!("{}/chat/completions", self.base_url);
        log::debug!("POST {url} ({service}, model {})", request.model);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .map_err(ServiceError::request(service))?;
        let parsed: ChatResponse = read_json(service, response)?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }

    /// Upload an audio file to the transcription endpoint.
    pub fn transcribe_file<T: DeserializeOwned>(
        &self,
        service: &'static str,
        audio_path: &Path,
        model: &'static str,
    ) -> Result<T, ServiceError> {
        self.limiter.admit(service)?;

        let url = format!("{}/audio/transcriptions", self.base_url);
        let form = multipart::Form::new()
            .text("model", model)
            .text("response_format", "verbose_json")
            .file("file", audio_path)?;

        log::debug!("POST {url} ({service}, {})", audio_path.display());
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .map_err(ServiceError::request(service))?;
        read_json(service, response)
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: reqwest::blocking::Response,
) -> Result<T, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(ServiceError::Server {
            service,
            status: status.as_u16(),
            body,
        });
    }
    response.json().map_err(ServiceError::request(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::rate_limiter::{RateLimitError, RateLimits};

    fn exhausted_limiter() -> Arc<RateLimiter> {
        Arc::new(RateLimiter::new(RateLimits {
            max_daily_calls: 0,
            max_per_minute: 0,
        }))
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = OpenAiClient::new(
            "sk-test",
            "https://api.example.com/v1/",
            Arc::new(RateLimiter::default()),
        );
        assert_eq!(client.base_url(), "https://api.example.com/v1");
    }

    #[test]
    fn test_chat_request_omits_unset_fields() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage::system("be brief"), ChatMessage::user("hi")],
            max_tokens: None,
            response_format: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("response_format").is_none());
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_chat_is_gated_before_any_request() {
        // Unroutable base URL: the limiter must reject before a connection is tried.
        let client = OpenAiClient::new("sk-test", "http://127.0.0.1:9", exhausted_limiter());
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage::user("hi")],
            max_tokens: Some(10),
            response_format: None,
        };
        let err = client.chat("chat", &request).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::RateLimited(RateLimitError::DailyLimit { .. })
        ));
    }

    #[test]
    fn test_chat_response_without_content() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
        let empty: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.choices.is_empty());
    }
}
