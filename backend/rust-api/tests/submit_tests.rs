mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use quizforge_api::store::QuizStore;
use serde_json::json;
use tower::ServiceExt;

fn submit_request(quiz_id: &str, answers: serde_json::Value, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/quiz/submit")
        .header("content-type", "application/json");

    if let Some(session_id) = session {
        builder = builder.header("cookie", format!("sessionId={}", session_id));
    }

    builder
        .body(Body::from(
            serde_json::to_string(&json!({ "quizId": quiz_id, "answers": answers })).unwrap(),
        ))
        .unwrap()
}

#[tokio::test]
async fn submit_without_session_cookie_is_rejected() {
    let (app, store) = common::create_test_app();
    let quiz = store
        .create_quiz(Some("history"), common::sample_payload())
        .await
        .unwrap();

    let response = app
        .oneshot(submit_request(&quiz.quiz_id, json!([]), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Session not found");
}

#[tokio::test]
async fn submit_unknown_quiz_is_not_found_and_records_nothing() {
    let (app, store) = common::create_test_app();
    store
        .create_quiz(Some("history"), common::sample_payload())
        .await
        .unwrap();

    let response = app
        .oneshot(submit_request(
            "no-such-quiz",
            json!([{ "id": 1, "answer": "A" }]),
            Some("session-1"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(store
        .list_scores("session-1", "history")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn partial_submission_withholds_low_score_but_persists_it() {
    let (app, store) = common::create_test_app();
    let quiz = store
        .create_quiz(Some("history"), common::sample_payload())
        .await
        .unwrap();

    let response = app
        .oneshot(submit_request(
            &quiz.quiz_id,
            json!([{ "id": 1, "answer": "A" }, { "id": 2, "answer": "X" }]),
            Some("session-1"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["showScore"], false);
    assert_eq!(json["correct"], 1);
    assert_eq!(json["total"], 3);
    // Withheld: the numeric score is absent from the body
    assert!(json.get("score").is_none());

    // But the attempt stores the true score for retargeting
    let scores = store.list_scores("session-1", "history").await.unwrap();
    assert_eq!(scores.len(), 1);
    assert!((scores[0] - 100.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn full_correct_submission_discloses_the_score() {
    let (app, store) = common::create_test_app();
    let quiz = store
        .create_quiz(Some("history"), common::sample_payload())
        .await
        .unwrap();

    let response = app
        .oneshot(submit_request(
            &quiz.quiz_id,
            json!([
                { "id": 1, "answer": "A" },
                { "id": 2, "answer": "B" },
                { "id": 3, "answer": "C" }
            ]),
            Some("session-1"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["showScore"], true);
    assert_eq!(json["score"], 100.0);
    assert_eq!(json["correct"], 3);
    assert_eq!(json["total"], 3);
}

#[tokio::test]
async fn empty_answer_list_scores_zero() {
    let (app, store) = common::create_test_app();
    let quiz = store
        .create_quiz(Some("history"), common::sample_payload())
        .await
        .unwrap();

    let response = app
        .oneshot(submit_request(&quiz.quiz_id, json!([]), Some("session-1")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["correct"], 0);
    assert_eq!(json["total"], 3);
    assert_eq!(json["showScore"], false);

    let scores = store.list_scores("session-1", "history").await.unwrap();
    assert_eq!(scores, vec![0.0]);
}

#[tokio::test]
async fn repeated_answers_for_one_item_cannot_inflate_the_score() {
    let (app, store) = common::create_test_app();
    let quiz = store
        .create_quiz(Some("history"), common::sample_payload())
        .await
        .unwrap();

    // Four copies of the same correct pair still grade as one item of three.
    let response = app
        .oneshot(submit_request(
            &quiz.quiz_id,
            json!([
                { "id": 1, "answer": "A" },
                { "id": 1, "answer": "A" },
                { "id": 1, "answer": "A" },
                { "id": 1, "answer": "A" }
            ]),
            Some("session-1"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["correct"], 1);
    assert_eq!(json["total"], 3);
    assert_eq!(json["showScore"], false);

    let scores = store.list_scores("session-1", "history").await.unwrap();
    assert_eq!(scores.len(), 1);
    assert!(scores[0] <= 100.0);
    assert!((scores[0] - 100.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn resubmission_records_a_second_attempt() {
    // No idempotency on submission: duplicate deliveries double-record.
    let (app, store) = common::create_test_app();
    let quiz = store
        .create_quiz(Some("history"), common::sample_payload())
        .await
        .unwrap();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(submit_request(
                &quiz.quiz_id,
                json!([{ "id": 1, "answer": "A" }]),
                Some("session-1"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let scores = store.list_scores("session-1", "history").await.unwrap();
    assert_eq!(scores.len(), 2);
}
