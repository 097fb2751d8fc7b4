use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Attempt, IntakeRecord, Quiz, QuizPayload, SubmittedAnswer};

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Persistence contract for intake records, quizzes and attempts. Backed by
/// MongoDB in production and by an in-memory map in tests; all coordination
/// between requests goes through this trait.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Inserts an intake record iff none exists for the session. Atomic with
    /// respect to concurrent calls: the loser of a race gets the winner's
    /// record back, never an error and never a second record.
    async fn create_intake_if_absent(
        &self,
        session_id: &str,
        answers: &[crate::models::IntakeAnswer],
    ) -> Result<IntakeRecord, StoreError>;

    async fn get_intake(&self, session_id: &str) -> Result<Option<IntakeRecord>, StoreError>;

    /// Stores a validated quiz payload under a freshly generated id.
    async fn create_quiz(
        &self,
        field_of_study: Option<&str>,
        payload: QuizPayload,
    ) -> Result<Quiz, StoreError>;

    async fn get_quiz(&self, quiz_id: &str) -> Result<Option<Quiz>, StoreError>;

    /// Scores of all attempts by this session on quizzes of the given field
    /// of study. Unordered; used for difficulty retargeting.
    async fn list_scores(
        &self,
        session_id: &str,
        field_of_study: &str,
    ) -> Result<Vec<f64>, StoreError>;

    async fn create_attempt(
        &self,
        quiz_id: &str,
        session_id: &str,
        answers: &[SubmittedAnswer],
        score: f64,
    ) -> Result<Attempt, StoreError>;

    /// Liveness probe backing the /health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
