use serde::{Deserialize, Serialize};

use super::speaker::Speaker;

/// Candidate dialogue line as proposed by the segmentation service.
///
/// Untrusted: segments may overlap, arrive unsorted or have a near-zero (or
/// even negative) duration. `TimelineReconciler` turns them into lines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSegment {
    pub speaker: Speaker,
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl RawSegment {
    pub fn new(speaker: Speaker, text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            speaker,
            text: text.into(),
            start_time,
            end_time,
        }
    }
}
