use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use quiz_db::{create_pool, run_migrations, DbRuntimeSettings};
use quiz_server::{app, AppState};
use quiz_store::NewChoice;
use serde_json::Value;
use tower::ServiceExt;

fn setup_app() -> (axum::Router, quiz_db::DbPool) {
    // A single pooled connection: every request must see the same
    // in-memory database, and each :memory: connection is its own db.
    let settings = DbRuntimeSettings {
        busy_timeout_ms: 5_000,
        pool_max_size: 1,
    };
    let pool = create_pool(":memory:", settings).unwrap();
    {
        let conn = pool.get().unwrap();
        run_migrations(&conn).unwrap();
    }

    (app(AppState { pool: pool.clone() }), pool)
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn choices_for_unknown_question_return_404() {
    let (app, _pool) = setup_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/choices/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["detail"], "Question Not Found");
}

#[tokio::test]
async fn question_without_choices_returns_404() {
    let (app, pool) = setup_app();

    let id = {
        let conn = pool.get().unwrap();
        quiz_store::create_question_with_choices(&conn, "no choices here", &[]).unwrap()
    };

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/choices/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["detail"], "Choices is Not Found");
}

#[tokio::test]
async fn all_choices_returned_with_matching_fields() {
    let (app, pool) = setup_app();

    let choices = vec![
        NewChoice {
            choice_text: Some("red".to_string()),
            is_correct: false,
        },
        NewChoice {
            choice_text: None,
            is_correct: true,
        },
        NewChoice {
            choice_text: Some("blue".to_string()),
            is_correct: false,
        },
    ];
    let id = {
        let conn = pool.get().unwrap();
        quiz_store::create_question_with_choices(&conn, "favorite color?", &choices).unwrap()
    };

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/choices/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let returned = json.as_array().expect("response should be an array");
    assert_eq!(returned.len(), 3);

    for choice in returned {
        assert_eq!(choice["question_id"], id);
    }
    assert_eq!(returned[0]["choice_text"], "red");
    assert_eq!(returned[0]["is_correct"], false);
    assert_eq!(returned[1]["choice_text"], Value::Null);
    assert_eq!(returned[1]["is_correct"], true);
    assert_eq!(returned[2]["choice_text"], "blue");
    assert_eq!(returned[2]["is_correct"], false);
}

#[tokio::test]
async fn create_then_read_choices_end_to_end() {
    let (app, _pool) = setup_app();

    let body = serde_json::json!({
        "question_text": "2+2?",
        "choices": [
            {"choice_text": "4", "is_correct": true},
            {"choice_text": "5", "is_correct": false}
        ]
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/questions/")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Question created successfully");

    // First question in a fresh database gets id 1.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/choices/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!([
            {"id": 1, "choice_text": "4", "is_correct": true, "question_id": 1},
            {"id": 2, "choice_text": "5", "is_correct": false, "question_id": 1}
        ])
    );
}

#[tokio::test]
async fn repeated_choice_reads_return_identical_payloads() {
    let (app, pool) = setup_app();

    let id = {
        let conn = pool.get().unwrap();
        quiz_store::create_question_with_choices(
            &conn,
            "stable?",
            &[NewChoice {
                choice_text: Some("yes".to_string()),
                is_correct: true,
            }],
        )
        .unwrap()
    };

    let first = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/choices/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let second = app
        .oneshot(
            Request::builder()
                .uri(format!("/choices/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_json(first).await, body_json(second).await);
}
