use crate::script::domain::dialogue_segmenter::DialogueSegmenter;
use crate::script::domain::raw_segment::RawSegment;
use crate::script::domain::speaker::Speaker;
use crate::shared::service_error::ServiceError;
use crate::transcription::domain::transcript::TranscriptSegment;

/// Deterministic segmenter used when AI access is disabled.
#[derive(Debug, Default)]
pub struct MockDialogueSegmenter;

impl DialogueSegmenter for MockDialogueSegmenter {
    fn refine(&self, segments: &[TranscriptSegment]) -> Result<Vec<RawSegment>, ServiceError> {
        log::info!(
            "Mock segmentation of {} transcript segments",
            segments.len()
        );
        Ok(vec![
            RawSegment::new(Speaker::Npc, "こんにちは、元気ですか？", 0.0, 2.5),
            RawSegment::new(Speaker::User, "はい、元気です！", 2.6, 4.5),
        ])
    }
}
