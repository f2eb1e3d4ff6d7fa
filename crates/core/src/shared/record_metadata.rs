use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::constants::SCHEMA_VERSION;

/// Creation stamp attached to every produced record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    pub created_at: DateTime<Utc>,
    pub version: String,
}

impl RecordMetadata {
    pub fn now() -> Self {
        Self {
            created_at: Utc::now(),
            version: SCHEMA_VERSION.to_string(),
        }
    }
}
