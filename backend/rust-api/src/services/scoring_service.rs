use std::sync::Arc;

use crate::errors::ApiError;
use crate::metrics::ATTEMPTS_GRADED_TOTAL;
use crate::models::{QuizItem, SubmittedAnswer};
use crate::store::QuizStore;

/// Scores at or above this are disclosed to the caller; lower scores are
/// withheld (counts only). Product policy, not a security boundary.
pub const DISCLOSURE_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GradedSubmission {
    pub correct_count: usize,
    pub total: usize,
    pub score: f64,
    pub disclosed: bool,
}

pub struct ScoringService {
    store: Arc<dyn QuizStore>,
}

impl ScoringService {
    pub fn new(store: Arc<dyn QuizStore>) -> Self {
        Self { store }
    }

    /// Grades a submission against the stored answer key and persists the
    /// attempt with the true score regardless of disclosure. An unknown quiz
    /// id fails before any attempt row is written.
    pub async fn submit(
        &self,
        quiz_id: &str,
        session_id: &str,
        answers: &[SubmittedAnswer],
    ) -> Result<GradedSubmission, ApiError> {
        let quiz = self
            .store
            .get_quiz(quiz_id)
            .await?
            .ok_or(ApiError::QuizNotFound)?;

        let graded = grade(&quiz.payload.items, answers);

        self.store
            .create_attempt(quiz_id, session_id, answers, graded.score)
            .await?;

        let disclosed_label = if graded.disclosed { "disclosed" } else { "withheld" };
        ATTEMPTS_GRADED_TOTAL
            .with_label_values(&[disclosed_label])
            .inc();

        tracing::info!(
            "Attempt graded: quiz={}, session={}, correct={}/{}, disclosed={}",
            quiz_id,
            session_id,
            graded.correct_count,
            graded.total,
            graded.disclosed
        );

        Ok(graded)
    }
}

/// Each stored item counts at most once, on exact string equality with a
/// submitted answer naming its id; duplicated submissions for one id cannot
/// inflate the count. Submitted ids with no matching item are ignored; the
/// divisor is the stored item count, so unanswered items count as incorrect.
/// The score therefore always lands in [0, 100].
fn grade(items: &[QuizItem], answers: &[SubmittedAnswer]) -> GradedSubmission {
    let total = items.len();

    let correct_count = items
        .iter()
        .filter(|item| {
            answers
                .iter()
                .any(|submitted| submitted.id == item.id && submitted.answer == item.correct_answer)
        })
        .count();

    let score = if total == 0 {
        0.0
    } else {
        100.0 * correct_count as f64 / total as f64
    };

    GradedSubmission {
        correct_count,
        total,
        score,
        disclosed: score >= DISCLOSURE_THRESHOLD,
    }
}
