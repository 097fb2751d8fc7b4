use std::sync::Arc;

use crate::errors::ApiError;
use crate::metrics::QUIZZES_GENERATED_TOTAL;
use crate::models::intake::{KEY_CURRENT_LEVEL, KEY_FIELD_OF_STUDY, KEY_QUIZ_LENGTH};
use crate::models::{IntakeAnswer, Quiz, QuizItem, QuizPayload};
use crate::services::difficulty::next_level;
use crate::services::generator_client::GeneratorClient;
use crate::store::QuizStore;

const DEFAULT_QUIZ_LENGTH: u32 = 5;
const DEFAULT_FIELD: &str = "general knowledge";
const DEFAULT_LEVEL: &str = "intermediate";

const SYSTEM_INSTRUCTION: &str = "You are an intelligent quiz generator. \
    Your output must be exclusively one JSON object with the keys 'title' and 'quiz'. \
    The output must be strict JSON with no additional text.";

/// Per-request generation orchestrator. All state is function-local and
/// reconstructed on every call; coordination happens through the store.
pub struct QuizService {
    store: Arc<dyn QuizStore>,
    generator: Arc<GeneratorClient>,
}

impl QuizService {
    pub fn new(store: Arc<dyn QuizStore>, generator: Arc<GeneratorClient>) -> Self {
        Self { store, generator }
    }

    /// Runs one generation cycle: validate intake answers, persist the
    /// intake record (first submission wins), retarget the difficulty from
    /// prior scores, call the generator, validate its output and store the
    /// quiz. A quiz row is written only after the output passed validation.
    pub async fn generate(
        &self,
        session_id: &str,
        answers: &[IntakeAnswer],
    ) -> Result<Quiz, ApiError> {
        if answers.is_empty() {
            return Err(ApiError::Validation(
                "Invalid or empty array of user answers.".to_string(),
            ));
        }

        let field = find_answer(answers, KEY_FIELD_OF_STUDY);
        let stated_level = find_answer(answers, KEY_CURRENT_LEVEL);
        let length = parse_quiz_length(find_answer(answers, KEY_QUIZ_LENGTH));

        // Best effort: a failed intake write must not block generation.
        if let Err(e) = self.store.create_intake_if_absent(session_id, answers).await {
            tracing::warn!(
                "Failed to persist intake for session {}: {}",
                session_id,
                e
            );
        }

        let level = match (field, stated_level) {
            (Some(field), Some(level)) => Some(self.retarget(session_id, field, level).await),
            _ => stated_level.map(str::to_string),
        };

        let prompt = build_prompt(field, level.as_deref(), length);
        let raw = self.generator.generate(SYSTEM_INSTRUCTION, &prompt).await?;
        let payload = parse_generated_quiz(&raw)?;

        let quiz = self.store.create_quiz(field, payload).await?;
        QUIZZES_GENERATED_TOTAL.inc();

        tracing::info!(
            "Quiz {} generated for session {} (field={:?}, level={:?}, items={})",
            quiz.quiz_id,
            session_id,
            quiz.field_of_study,
            level,
            quiz.payload.items.len()
        );

        Ok(quiz)
    }

    /// Adjusts the stated level from the session's score history in the same
    /// field. A store failure here is non-fatal: the quiz is generated at
    /// the unadjusted level.
    async fn retarget(&self, session_id: &str, field: &str, stated_level: &str) -> String {
        match self.store.list_scores(session_id, field).await {
            Ok(scores) => {
                let adjusted = next_level(stated_level, &scores);
                if adjusted != stated_level {
                    tracing::info!(
                        "Retargeted session {} in {} from {} to {} ({} prior scores)",
                        session_id,
                        field,
                        stated_level,
                        adjusted,
                        scores.len()
                    );
                }
                adjusted.to_string()
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch prior scores for session {} in {}: {}",
                    session_id,
                    field,
                    e
                );
                stated_level.to_string()
            }
        }
    }
}

fn find_answer<'a>(answers: &'a [IntakeAnswer], key: &str) -> Option<&'a str> {
    answers
        .iter()
        .find(|a| a.key == key)
        .map(|a| a.answer.as_str())
}

/// The length preference is free text ("10 questions please"); only a
/// leading integer token counts.
fn parse_quiz_length(answer: Option<&str>) -> u32 {
    answer
        .and_then(|a| a.split_whitespace().next())
        .and_then(|token| token.parse().ok())
        .unwrap_or(DEFAULT_QUIZ_LENGTH)
}

fn build_prompt(field: Option<&str>, level: Option<&str>, length: u32) -> String {
    format!(
        "Write {} multiple-choice questions about {} for a student at {} proficiency. \
         Respond with **only** one JSON object: {{\"title\": \"...\", \"quiz\": \
         [{{\"id\": number, \"question_text\": string, \"options\": [string], \
         \"correct_answer\": string}}]}}.",
        length,
        field.unwrap_or(DEFAULT_FIELD),
        level.unwrap_or(DEFAULT_LEVEL),
    )
}

/// Models habitually wrap the JSON object in a markdown code fence; strip a
/// leading and trailing fence marker before parsing. Only the outermost
/// markers go, so backticks inside question text are untouched.
fn clean_model_output(raw: &str) -> String {
    let mut cleaned = raw.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.trim_end().strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim().to_string()
}

/// Validates the generator's text blob into a typed payload. Requires a
/// non-empty title and an array-typed `quiz` of well-shaped items; anything
/// else is rejected with the raw and cleaned text attached, never coerced.
fn parse_generated_quiz(raw: &str) -> Result<QuizPayload, ApiError> {
    let cleaned = clean_model_output(raw);

    let invalid = |message: &str| ApiError::InvalidGenerationOutput {
        message: message.to_string(),
        raw: raw.to_string(),
        cleaned: cleaned.clone(),
    };

    let value: serde_json::Value =
        serde_json::from_str(&cleaned).map_err(|_| invalid("Invalid JSON returned by the model"))?;

    let title = value
        .get("title")
        .and_then(|t| t.as_str())
        .unwrap_or_default();
    let items_value = value.get("quiz").filter(|q| q.is_array());

    let (title, items_value) = match (title, items_value) {
        (t, Some(items)) if !t.is_empty() => (t.to_string(), items),
        _ => {
            return Err(invalid(
                "Invalid JSON format returned by the model. Missing title or quiz array.",
            ))
        }
    };

    let items: Vec<QuizItem> = serde_json::from_value(items_value.clone())
        .map_err(|_| invalid("Malformed quiz items returned by the model"))?;

    Ok(QuizPayload { title, items })
}
