use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::record_metadata::RecordMetadata;

use super::similarity_scorer::{SimilarityScore, WordScore};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub overall: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub summary: String,
}

/// Outcome of scoring one spoken attempt against one script line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub evaluation_id: String,
    pub scene_id: String,
    pub line_id: String,
    pub transcript: String,
    pub scores: Scores,
    pub word_scores: Vec<WordScore>,
    pub feedback: Feedback,
    /// Reserved for phoneme-level scoring; never populated.
    pub phoneme_score: Option<f64>,
    /// Reserved for word alignment output; never populated.
    pub alignment_map: Option<serde_json::Value>,
    pub metadata: RecordMetadata,
}

impl EvaluationResult {
    pub fn new(
        scene_id: &str,
        line_id: &str,
        transcript: String,
        score: SimilarityScore,
        feedback_summary: String,
    ) -> Self {
        Self {
            evaluation_id: Uuid::new_v4().to_string(),
            scene_id: scene_id.to_string(),
            line_id: line_id.to_string(),
            transcript,
            scores: Scores {
                overall: score.overall,
            },
            word_scores: score.word_scores,
            feedback: Feedback {
                summary: feedback_summary,
            },
            phoneme_score: None,
            alignment_map: None,
            metadata: RecordMetadata::now(),
        }
    }
}
