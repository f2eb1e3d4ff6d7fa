use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::script::domain::dialogue_segmenter::DialogueSegmenter;
use crate::script::domain::raw_segment::RawSegment;
use crate::shared::constants::CHAT_MODEL;
use crate::shared::openai_client::{ChatMessage, ChatRequest, OpenAiClient};
use crate::shared::service_error::ServiceError;
use crate::transcription::domain::transcript::TranscriptSegment;

const SERVICE: &str = "dialogue segmenter";

const SYSTEM_PROMPT: &str = "\
You are a Japanese dialogue editor for a language learning app.
You are given speech segments with timestamps.
Split them into short, natural dialogue lines.

IMPORTANT TEXT RULES:
- Preserve the original Japanese sentence structure.
- Keep kanji in the text.
- For EVERY kanji word, add its reading in hiragana or katakana in parentheses immediately after the word.
- Do NOT remove kanji.
- Do NOT romanize.
- Example: 元気ですか？ → 元気(げんき)ですか？

SPEAKER RULES:
- NPC = video speaker
- USER = learner response

TIMING RULES:
- Use the provided timestamps.
- Do NOT invent new times.

Return ONLY structured data matching the required schema.
Do not include explanations or markdown.";

#[derive(Debug, Deserialize)]
struct ScriptResponse {
    #[serde(default)]
    lines: Vec<RawSegment>,
}

/// Dialogue segmenter backed by a chat model with structured JSON output.
pub struct OpenAiDialogueSegmenter {
    client: Arc<OpenAiClient>,
}

impl OpenAiDialogueSegmenter {
    pub fn new(client: Arc<OpenAiClient>) -> Self {
        Self { client }
    }

    fn request(segments: &[TranscriptSegment]) -> Result<ChatRequest, ServiceError> {
        let payload =
            serde_json::to_string(segments).map_err(|e| ServiceError::InvalidResponse {
                service: SERVICE,
                reason: format!("could not encode transcript segments: {e}"),
            })?;

        Ok(ChatRequest {
            model: CHAT_MODEL,
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(payload)],
            max_tokens: None,
            response_format: Some(script_schema()),
        })
    }
}

impl DialogueSegmenter for OpenAiDialogueSegmenter {
    fn refine(&self, segments: &[TranscriptSegment]) -> Result<Vec<RawSegment>, ServiceError> {
        if segments.is_empty() {
            return Err(ServiceError::InvalidResponse {
                service: SERVICE,
                reason: "transcript has no segments to build a script from".to_string(),
            });
        }

        let request = Self::request(segments)?;
        let content = self.client.chat(SERVICE, &request)?;
        let lines = parse_script(content.as_deref())?;
        log::info!("Segmented {} transcript segments into {} lines", segments.len(), lines.len());
        Ok(lines)
    }
}

fn parse_script(content: Option<&str>) -> Result<Vec<RawSegment>, ServiceError> {
    let content = match content.map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => return Err(ServiceError::EmptyOutput(SERVICE)),
    };
    let parsed: ScriptResponse =
        serde_json::from_str(content).map_err(|e| ServiceError::InvalidResponse {
            service: SERVICE,
            reason: e.to_string(),
        })?;
    if parsed.lines.is_empty() {
        return Err(ServiceError::EmptyOutput(SERVICE));
    }
    Ok(parsed.lines)
}

fn script_schema() -> serde_json::Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "script_response",
            "strict": true,
            "schema": {
                "type": "object",
                "additionalProperties": false,
                "required": ["lines"],
                "properties": {
                    "lines": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "additionalProperties": false,
                            "required": ["speaker", "text", "startTime", "endTime"],
                            "properties": {
                                "speaker": { "type": "string", "enum": ["NPC", "USER"] },
                                "text": { "type": "string" },
                                "startTime": { "type": "number" },
                                "endTime": { "type": "number" }
                            }
                        }
                    }
                }
            }
        }
    })
}
