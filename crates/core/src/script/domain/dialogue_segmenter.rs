use crate::shared::service_error::ServiceError;
use crate::transcription::domain::transcript::TranscriptSegment;

use super::raw_segment::RawSegment;

/// Domain interface for splitting transcribed speech into dialogue lines.
///
/// Implementations return candidate lines only; ordering and timing are
/// enforced afterwards by `TimelineReconciler`. An implementation must fail
/// with `ServiceError::EmptyOutput` rather than return an empty list.
pub trait DialogueSegmenter: Send + Sync {
    fn refine(&self, segments: &[TranscriptSegment]) -> Result<Vec<RawSegment>, ServiceError>;
}
