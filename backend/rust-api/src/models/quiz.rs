use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single generated multiple-choice item. `id` is the grading key and is
/// unique within one quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizItem {
    pub id: i64,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// Validated generator output: a title plus the ordered item list. The wire
/// name of the item array is `quiz`, matching the generation contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizPayload {
    pub title: String,
    #[serde(rename = "quiz")]
    pub items: Vec<QuizItem>,
}

/// A stored quiz. Immutable after creation, read back by id for grading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(rename = "_id")]
    pub quiz_id: String,
    pub field_of_study: Option<String>,
    pub payload: QuizPayload,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct GetQuizResponse {
    pub quiz: Vec<QuizItem>,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuizResponse {
    pub quiz: Vec<QuizItem>,
    #[serde(rename = "quizId")]
    pub quiz_id: String,
    pub title: String,
}
