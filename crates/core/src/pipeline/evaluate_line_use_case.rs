use std::fs;
use std::path::PathBuf;

use crate::evaluation::domain::evaluation_result::EvaluationResult;
use crate::evaluation::domain::feedback_generator::FeedbackGenerator;
use crate::evaluation::domain::similarity_scorer::SimilarityScorer;
use crate::evaluation::domain::text_normalizer::TextNormalizer;
use crate::pipeline::artifact_scope::ArtifactScope;
use crate::pipeline::pipeline_error::EvaluateError;
use crate::shared::constants::FALLBACK_FEEDBACK;
use crate::transcription::domain::transcriber::Transcriber;

const ATTEMPT_FILE: &str = "attempt.webm";

/// One spoken attempt at one script line.
#[derive(Clone, Copy, Debug)]
pub struct EvaluationRequest<'a> {
    pub scene_id: &'a str,
    pub line_id: &'a str,
    pub expected_text: &'a str,
    pub audio: &'a [u8],
}

/// Transcribes an attempt, scores it against the expected line and attaches
/// best-effort feedback.
pub struct EvaluateLineUseCase {
    transcriber: Box<dyn Transcriber>,
    feedback: Option<Box<dyn FeedbackGenerator>>,
    work_root: Option<PathBuf>,
}

impl EvaluateLineUseCase {
    pub fn new(
        transcriber: Box<dyn Transcriber>,
        feedback: Option<Box<dyn FeedbackGenerator>>,
    ) -> Self {
        Self {
            transcriber,
            feedback,
            work_root: None,
        }
    }

    pub fn with_work_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.work_root = Some(root.into());
        self
    }

    pub fn execute(&self, request: EvaluationRequest<'_>) -> Result<EvaluationResult, EvaluateError> {
        if request.audio.is_empty() {
            return Err(EvaluateError::Validation("audio is empty".to_string()));
        }

        let mut scope = match &self.work_root {
            Some(root) => ArtifactScope::new_in(root),
            None => ArtifactScope::new(),
        }
        .map_err(EvaluateError::Workspace)?;

        let attempt_path = scope.register(ATTEMPT_FILE);
        fs::write(&attempt_path, request.audio).map_err(EvaluateError::Workspace)?;

        let transcript = self.transcriber.transcribe(&attempt_path)?;

        let expected = TextNormalizer::normalize(request.expected_text);
        let actual = TextNormalizer::normalize(&transcript.text);
        let score = SimilarityScorer::score(&expected, &actual);
        log::debug!(
            "Scored {}/{}: {:.3}",
            request.scene_id,
            request.line_id,
            score.overall
        );

        let summary = self.feedback_for(request.expected_text, &transcript.text, score.overall);

        Ok(EvaluationResult::new(
            request.scene_id,
            request.line_id,
            transcript.text,
            score,
            summary,
        ))
    }

    fn feedback_for(&self, expected: &str, transcript: &str, score: f64) -> String {
        let Some(generator) = &self.feedback else {
            return FALLBACK_FEEDBACK.to_string();
        };
        match generator.feedback(expected, transcript, score) {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => FALLBACK_FEEDBACK.to_string(),
            Err(e) => {
                log::warn!("Feedback unavailable, using fallback: {e}");
                FALLBACK_FEEDBACK.to_string()
            }
        }
    }
}
