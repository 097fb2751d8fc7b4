use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One answer from the intake survey. The `key` identifies the survey
/// question (e.g. `field_of_study`), `answer` is the free-text option the
/// user picked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntakeAnswer {
    pub question: String,
    pub key: String,
    pub answer: String,
}

/// The canonical intake survey for a session. At most one record exists per
/// session; the first submission wins and later ones are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeRecord {
    #[serde(rename = "_id")]
    pub session_id: String,
    pub answers: Vec<IntakeAnswer>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SessionAnswersResponse {
    pub answers: Vec<IntakeAnswer>,
}

/// Survey keys the orchestrator extracts from the intake answers.
pub const KEY_FIELD_OF_STUDY: &str = "field_of_study";
pub const KEY_CURRENT_LEVEL: &str = "current_level";
pub const KEY_QUIZ_LENGTH: &str = "quiz_length_preference";
