use crate::shared::service_error::ServiceError;

/// Domain interface for natural-language coaching on an attempt.
///
/// Best-effort: callers substitute a fixed message on any `Err`.
pub trait FeedbackGenerator: Send + Sync {
    fn feedback(
        &self,
        expected_text: &str,
        transcript_text: &str,
        score: f64,
    ) -> Result<String, ServiceError>;
}
