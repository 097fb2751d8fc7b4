use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::{
    errors::ApiError,
    models::SessionAnswersResponse,
    services::{session_identity, AppState},
};

/// GET /session/answers - The session's canonical intake survey answers
pub async fn get_session_answers(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = session_identity::carried_session(&jar).ok_or(ApiError::SessionMissing)?;

    let record = state
        .store
        .get_intake(&session_id)
        .await?
        .ok_or(ApiError::IntakeNotFound)?;

    Ok(Json(SessionAnswersResponse {
        answers: record.answers,
    }))
}
