use std::env;
use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

use resume_builder_backend::{routes, storage::MemStore, AppState};

static DOCS_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();

fn test_app() -> Router {
    let docs = DOCS_DIR.get_or_init(|| tempfile::tempdir().expect("create docs dir"));
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("DOCUMENTS_DIR", docs.path());
    let _ = resume_builder_backend::config::init_config();

    let store = Arc::new(MemStore::new());
    routes::build_router(AppState::new(store))
}

fn post_json(uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn read_json(resp: Response) -> JsonValue {
    let bytes = to_bytes(resp.into_body(), 10 * 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn ada_payload() -> JsonValue {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@x.com",
        "title": "Engineer",
        "phone": "+1-555-0100",
        "location": "London",
        "skills": "Python, C++, SQL, AWS, Git",
        "education": "BSc CS, X University, 2010",
        "experience": "Line1\nLine2\nLine3\nLine4",
    })
}

#[tokio::test]
async fn health_answers_ok() {
    let app = test_app();
    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn generate_returns_the_scored_record() {
    let app = test_app();
    let resp = app
        .oneshot(post_json("/resumes", ada_payload()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_json(resp).await;
    assert_eq!(body["score"], 55);
    assert_eq!(body["template_style"], "modern");
    assert_eq!(body["downloaded_count"], 0);
    assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());

    // No summary in the payload, so the report must say so.
    let feedback: Vec<&str> = body["feedback"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_str().unwrap())
        .collect();
    assert!(feedback.iter().any(|f| f.contains("summary")));

    // Storage paths never reach the wire.
    assert!(body.get("pdf_path").is_none());
}

#[tokio::test]
async fn empty_submission_lists_every_missing_field() {
    let app = test_app();
    let resp = app.oneshot(post_json("/resumes", json!({}))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = read_json(resp).await;
    assert_eq!(body["error"], "validation_failed");
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec!["name", "email", "title", "experience", "education", "skills"]
    );
}

#[tokio::test]
async fn malformed_email_is_rejected() {
    let app = test_app();
    let mut payload = ada_payload();
    payload["email"] = json!("not-an-email");

    let resp = app.oneshot(post_json("/resumes", payload)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = read_json(resp).await;
    assert_eq!(body["error"], "validation_failed");
    assert_eq!(body["fields"], json!(["email"]));
}

#[tokio::test]
async fn resubmission_reuses_the_user() {
    let app = test_app();

    let first = read_json(
        app.clone()
            .oneshot(post_json("/resumes", ada_payload()))
            .await
            .unwrap(),
    )
    .await;

    let mut second_payload = ada_payload();
    second_payload["name"] = json!("A. Lovelace");
    let second = read_json(
        app.clone()
            .oneshot(post_json("/resumes", second_payload))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(first["user_id"], second["user_id"]);
    assert_ne!(first["id"], second["id"]);

    let resp = app
        .clone()
        .oneshot(get("/resumes?email=ada@x.com"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let listed = read_json(resp).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    // Newest first.
    assert_eq!(listed[0]["id"], second["id"]);
    assert_eq!(listed[1]["id"], first["id"]);
}

#[tokio::test]
async fn unknown_email_lists_nothing() {
    let app = test_app();
    let resp = app
        .oneshot(get("/resumes?email=nobody@x.com"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_json(resp).await, json!([]));
}

#[tokio::test]
async fn download_serves_the_pdf_and_counts() {
    let app = test_app();
    let created = read_json(
        app.clone()
            .oneshot(post_json("/resumes", ada_payload()))
            .await
            .unwrap(),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(get(&format!("/resumes/{}/download", id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        resp.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"resume_{}.pdf\"", id).as_str()
    );
    let bytes = to_bytes(resp.into_body(), 10 * 1024 * 1024).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    // A second download moves the counter to 2.
    app.clone()
        .oneshot(get(&format!("/resumes/{}/download", id)))
        .await
        .unwrap();
    let listed = read_json(
        app.oneshot(get("/resumes?email=ada@x.com")).await.unwrap(),
    )
    .await;
    assert_eq!(listed[0]["downloaded_count"], 2);
}

#[tokio::test]
async fn concurrent_downloads_each_count_once() {
    let app = test_app();
    let created = read_json(
        app.clone()
            .oneshot(post_json("/resumes", ada_payload()))
            .await
            .unwrap(),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        let uri = format!("/resumes/{}/download", id);
        handles.push(tokio::spawn(async move {
            let resp = app.oneshot(get(&uri)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let listed = read_json(
        app.oneshot(get("/resumes?email=ada@x.com")).await.unwrap(),
    )
    .await;
    assert_eq!(listed[0]["downloaded_count"], 8);
}

#[tokio::test]
async fn unknown_resume_download_is_not_found() {
    let app = test_app();
    let resp = app
        .oneshot(get(&format!("/resumes/{}/download", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = read_json(resp).await;
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn malformed_resume_id_is_a_bad_request() {
    let app = test_app();
    let resp = app
        .oneshot(get("/resumes/not-a-uuid/download"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn every_known_style_generates() {
    let app = test_app();
    for (i, style) in ["modern", "classic", "minimal", "elegant"].iter().enumerate() {
        let mut payload = ada_payload();
        payload["email"] = json!(format!("user{}@x.com", i));
        payload["template_style"] = json!(style);

        let resp = app
            .clone()
            .oneshot(post_json("/resumes", payload))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["template_style"], *style);
    }
}

#[tokio::test]
async fn unknown_style_falls_back_to_default() {
    let app = test_app();
    let mut payload = ada_payload();
    payload["template_style"] = json!("brutalist");

    let body = read_json(
        app.oneshot(post_json("/resumes", payload)).await.unwrap(),
    )
    .await;
    assert_eq!(body["template_style"], "modern");
}
