use serde::{Deserialize, Serialize};

/// Who delivers a line: the character in the video or the learner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    #[serde(rename = "NPC")]
    Npc,
    #[serde(rename = "USER")]
    User,
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::Npc => write!(f, "NPC"),
            Speaker::User => write!(f, "USER"),
        }
    }
}
