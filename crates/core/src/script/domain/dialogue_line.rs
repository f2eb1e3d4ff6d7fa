use serde::{Deserialize, Serialize};

use super::speaker::Speaker;

/// A validated line of the practice script.
///
/// Produced only by `TimelineReconciler`; within a script, lines are sorted,
/// never overlap and each lasts at least `MIN_LINE_DURATION`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueLine {
    pub id: String,
    pub speaker: Speaker,
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    /// Reserved for phoneme-level scoring; never populated.
    pub phonemes: Option<Vec<String>>,
    /// Reserved for pitch-accent display; never populated.
    pub pitch_pattern: Option<Vec<i32>>,
}

impl DialogueLine {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line() -> DialogueLine {
        DialogueLine {
            id: "line-1".to_string(),
            speaker: Speaker::Npc,
            text: "こんにちは".to_string(),
            start_time: 1.25,
            end_time: 2.0,
            phonemes: None,
            pitch_pattern: None,
        }
    }

    #[test]
    fn test_duration() {
        assert_relative_eq!(line().duration(), 0.75);
    }

    #[test]
    fn test_serializes_reserved_fields_as_null() {
        let json = serde_json::to_value(line()).unwrap();
        assert_eq!(json["startTime"], 1.25);
        assert_eq!(json["endTime"], 2.0);
        assert!(json["phonemes"].is_null());
        assert!(json["pitchPattern"].is_null());
    }
}
