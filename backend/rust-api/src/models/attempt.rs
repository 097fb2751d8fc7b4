use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One answer of a quiz submission, keyed by the quiz item id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmittedAnswer {
    pub id: i64,
    pub answer: String,
}

/// A graded submission of a quiz by a session. The score is computed once at
/// submission time and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    #[serde(rename = "_id")]
    pub id: String,
    pub quiz_id: String,
    pub session_id: String,
    pub answers: Vec<SubmittedAnswer>,
    pub score: f64,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    #[serde(rename = "quizId")]
    pub quiz_id: String,
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub success: bool,
    /// The numeric score is withheld below the disclosure threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(rename = "showScore")]
    pub show_score: bool,
    pub correct: usize,
    pub total: usize,
}
