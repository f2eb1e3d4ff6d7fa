use std::sync::Arc;

use crate::evaluation::domain::feedback_generator::FeedbackGenerator;
use crate::shared::constants::CHAT_MODEL;
use crate::shared::openai_client::{ChatMessage, ChatRequest, OpenAiClient};
use crate::shared::service_error::ServiceError;

const SERVICE: &str = "feedback";
const MAX_TOKENS: u32 = 60;

const SYSTEM_PROMPT: &str = "\
You are a Japanese language tutor.
Give one sentence of encouragement and one concrete improvement tip.";

/// Tutor feedback from a chat model.
pub struct OpenAiFeedbackGenerator {
    client: Arc<OpenAiClient>,
}

impl OpenAiFeedbackGenerator {
    pub fn new(client: Arc<OpenAiClient>) -> Self {
        Self { client }
    }

    fn request(expected_text: &str, transcript_text: &str, score: f64) -> ChatRequest {
        ChatRequest {
            model: CHAT_MODEL,
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(format!(
                    "Expected: {expected_text}\nUser said: {transcript_text}\nScore: {score}"
                )),
            ],
            max_tokens: Some(MAX_TOKENS),
            response_format: None,
        }
    }
}

impl FeedbackGenerator for OpenAiFeedbackGenerator {
    fn feedback(
        &self,
        expected_text: &str,
        transcript_text: &str,
        score: f64,
    ) -> Result<String, ServiceError> {
        let request = Self::request(expected_text, transcript_text, score);
        let content = self.client.chat(SERVICE, &request)?;
        match content.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(ServiceError::EmptyOutput(SERVICE)),
        }
    }
}
