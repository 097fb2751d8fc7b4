use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{QuizStore, StoreError};
use crate::models::{Attempt, IntakeAnswer, IntakeRecord, Quiz, QuizPayload, SubmittedAnswer};

#[derive(Default)]
struct Inner {
    intakes: HashMap<String, IntakeRecord>,
    quizzes: HashMap<String, Quiz>,
    attempts: Vec<Attempt>,
}

/// In-memory store used by the integration tests. The write lock makes
/// create-if-absent atomic without a database.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn create_intake_if_absent(
        &self,
        session_id: &str,
        answers: &[IntakeAnswer],
    ) -> Result<IntakeRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .intakes
            .entry(session_id.to_string())
            .or_insert_with(|| IntakeRecord {
                session_id: session_id.to_string(),
                answers: answers.to_vec(),
                created_at: Utc::now(),
            });
        Ok(record.clone())
    }

    async fn get_intake(&self, session_id: &str) -> Result<Option<IntakeRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.intakes.get(session_id).cloned())
    }

    async fn create_quiz(
        &self,
        field_of_study: Option<&str>,
        payload: QuizPayload,
    ) -> Result<Quiz, StoreError> {
        let quiz = Quiz {
            quiz_id: Uuid::new_v4().to_string(),
            field_of_study: field_of_study.map(|f| f.to_string()),
            payload,
            created_at: Utc::now(),
        };

        let mut inner = self.inner.write().await;
        inner.quizzes.insert(quiz.quiz_id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn get_quiz(&self, quiz_id: &str) -> Result<Option<Quiz>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.quizzes.get(quiz_id).cloned())
    }

    async fn list_scores(
        &self,
        session_id: &str,
        field_of_study: &str,
    ) -> Result<Vec<f64>, StoreError> {
        let inner = self.inner.read().await;
        let scores = inner
            .attempts
            .iter()
            .filter(|a| a.session_id == session_id)
            .filter(|a| {
                inner
                    .quizzes
                    .get(&a.quiz_id)
                    .is_some_and(|q| q.field_of_study.as_deref() == Some(field_of_study))
            })
            .map(|a| a.score)
            .collect();
        Ok(scores)
    }

    async fn create_attempt(
        &self,
        quiz_id: &str,
        session_id: &str,
        answers: &[SubmittedAnswer],
        score: f64,
    ) -> Result<Attempt, StoreError> {
        let attempt = Attempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            session_id: session_id.to_string(),
            answers: answers.to_vec(),
            score,
            submitted_at: Utc::now(),
        };

        let mut inner = self.inner.write().await;
        inner.attempts.push(attempt.clone());
        Ok(attempt)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
