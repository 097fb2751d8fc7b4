use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};
use uuid::Uuid;

use super::{QuizStore, StoreError};
use crate::models::{Attempt, IntakeAnswer, IntakeRecord, Quiz, QuizPayload, SubmittedAnswer};

const INTAKE_COLLECTION: &str = "intake_records";
const QUIZ_COLLECTION: &str = "quizzes";
const ATTEMPT_COLLECTION: &str = "attempts";

/// MongoDB-backed store. Intake uniqueness rides on the `_id` index: the
/// session id is the document id, so a concurrent duplicate insert fails
/// with code 11000 and the loser re-reads the winner's record.
pub struct MongoStore {
    mongo: Database,
}

impl MongoStore {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    fn intakes(&self) -> Collection<IntakeRecord> {
        self.mongo.collection(INTAKE_COLLECTION)
    }

    fn quizzes(&self) -> Collection<Quiz> {
        self.mongo.collection(QUIZ_COLLECTION)
    }

    fn attempts(&self) -> Collection<Attempt> {
        self.mongo.collection(ATTEMPT_COLLECTION)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    if let mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(ref we)) =
        *err.kind
    {
        return we.code == 11000;
    }
    false
}

#[async_trait]
impl QuizStore for MongoStore {
    async fn create_intake_if_absent(
        &self,
        session_id: &str,
        answers: &[IntakeAnswer],
    ) -> Result<IntakeRecord, StoreError> {
        let record = IntakeRecord {
            session_id: session_id.to_string(),
            answers: answers.to_vec(),
            created_at: Utc::now(),
        };

        match self.intakes().insert_one(&record).await {
            Ok(_) => {
                tracing::info!("Intake record created for session {}", session_id);
                Ok(record)
            }
            Err(e) if is_duplicate_key(&e) => {
                tracing::debug!(
                    "Intake record already exists for session {}, keeping original",
                    session_id
                );
                self.get_intake(session_id).await?.ok_or_else(|| {
                    StoreError::Unavailable(format!(
                        "intake record for session {} vanished after duplicate-key conflict",
                        session_id
                    ))
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_intake(&self, session_id: &str) -> Result<Option<IntakeRecord>, StoreError> {
        let record = self
            .intakes()
            .find_one(doc! { "_id": session_id })
            .await?;
        Ok(record)
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

        self.quizzes().insert_one(&quiz).await?;
        tracing::info!(
            "Quiz {} stored ({} items)",
            quiz.quiz_id,
            quiz.payload.items.len()
        );
        Ok(quiz)
    }

    async fn get_quiz(&self, quiz_id: &str) -> Result<Option<Quiz>, StoreError> {
        let quiz = self.quizzes().find_one(doc! { "_id": quiz_id }).await?;
        Ok(quiz)
    }

    async fn list_scores(
        &self,
        session_id: &str,
        field_of_study: &str,
    ) -> Result<Vec<f64>, StoreError> {
        // Two-step join: quiz ids for the field first, then this session's
        // attempts against those quizzes.
        let quizzes: Vec<Quiz> = self
            .quizzes()
            .find(doc! { "field_of_study": field_of_study })
            .await?
            .try_collect()
            .await?;

        let quiz_ids: Vec<String> = quizzes.into_iter().map(|q| q.quiz_id).collect();
        if quiz_ids.is_empty() {
            return Ok(Vec::new());
        }

        let attempts: Vec<Attempt> = self
            .attempts()
            .find(doc! {
                "session_id": session_id,
                "quiz_id": { "$in": quiz_ids },
            })
            .await?
            .try_collect()
            .await?;

        Ok(attempts.into_iter().map(|a| a.score).collect())
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

        self.attempts().insert_one(&attempt).await?;
        tracing::info!(
            "Attempt {} saved: quiz={}, session={}, score={:.1}",
            attempt.id,
            quiz_id,
            session_id,
            score
        );
        Ok(attempt)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.mongo.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
