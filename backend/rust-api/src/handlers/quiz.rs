use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    errors::ApiError,
    extractors::AppJson,
    models::{
        GenerateQuizResponse, GetQuizResponse, IntakeAnswer, SubmitQuizRequest,
        SubmitQuizResponse,
    },
    services::{
        quiz_service::QuizService, scoring_service::ScoringService, session_identity, AppState,
    },
};

#[derive(Debug, Deserialize)]
pub struct GetQuizParams {
    #[serde(rename = "quizId")]
    quiz_id: Option<String>,
}

/// GET /quiz?quizId=<id> - Fetch a stored quiz for taking
pub async fn get_quiz(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GetQuizParams>,
) -> Result<impl IntoResponse, ApiError> {
    let quiz_id = params
        .quiz_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("Quiz ID is missing.".to_string()))?;

    let quiz = state
        .store
        .get_quiz(&quiz_id)
        .await?
        .ok_or(ApiError::QuizNotFound)?;

    Ok(Json(GetQuizResponse {
        quiz: quiz.payload.items,
        title: quiz.payload.title,
    }))
}

/// POST /quiz - Run one generation cycle from the intake answers
pub async fn generate_quiz(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    AppJson(answers): AppJson<Vec<IntakeAnswer>>,
) -> Result<impl IntoResponse, ApiError> {
    let (session_id, is_new) = session_identity::resolve_session(&jar);

    tracing::info!(
        "Generating quiz for session {} ({} intake answers)",
        session_id,
        answers.len()
    );

    let service = QuizService::new(state.store.clone(), state.generator.clone());
    let quiz = service.generate(&session_id, &answers).await?;

    // The cookie is issued only on success and only when freshly minted.
    let jar = if is_new {
        jar.add(session_identity::session_cookie(&session_id))
    } else {
        jar
    };

    Ok((
        jar,
        Json(GenerateQuizResponse {
            quiz: quiz.payload.items,
            quiz_id: quiz.quiz_id,
            title: quiz.payload.title,
        }),
    ))
}

/// POST /quiz/submit - Grade a submission against the stored answer key
pub async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    AppJson(req): AppJson<SubmitQuizRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = session_identity::carried_session(&jar).ok_or(ApiError::SessionMissing)?;

    let service = ScoringService::new(state.store.clone());
    let graded = service
        .submit(&req.quiz_id, &session_id, &req.answers)
        .await?;

    Ok(Json(SubmitQuizResponse {
        success: true,
        score: graded.disclosed.then_some(graded.score),
        show_score: graded.disclosed,
        correct: graded.correct_count,
        total: graded.total,
    }))
}
