//! Router-level tests: requests go through the full axum stack via `oneshot`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use docchat_core::{Config, Provider};
use docchat_llm::{AnswerEngine, AnswerError};
use docchat_server::{build_router, AppState};
use docchat_session::SessionId;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::sync::Notify;
use tower::ServiceExt;

const BOUNDARY: &str = "docchat-test-boundary";

fn app() -> Router {
    build_router(Arc::new(AppState::new(Config::default())))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn upload(session: &str, files: &[(&str, &str)]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, content) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: text/plain\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(format!("/sessions/{session}/documents"))
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

async fn new_session(app: &Router) -> String {
    let (status, body) = send(app, json_request("POST", "/sessions", json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 0);
}

#[tokio::test]
async fn config_is_redacted() {
    let app = app();
    let (status, body) = send(&app, get("/config")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["llm"]["provider"], "extractive");
    assert!(body["llm"].get("openai_api_key").is_none());
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let app = app();
    let id = new_session(&app).await;
    let (status, body) = send(&app, json_request("POST", "/sessions", json!({ "id": id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["pdf_processed"], false);
}

#[tokio::test]
async fn upload_then_ask_extractive() {
    let app = app();
    let id = new_session(&app).await;

    let (status, body) = send(&app, upload(&id, &[("sky.txt", "The sky is blue.")])).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["documents"], json!(["sky.txt"]));
    assert_eq!(body["provider"], "extractive");

    let (status, body) = send(
        &app,
        json_request("POST", &format!("/sessions/{id}/ask"), json!({ "question": "What color is the sky?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["answer"].as_str().unwrap().contains("blue"));
    let turns = body["conversation"].as_array().unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0]["role"], "bot");
    assert_eq!(turns[1]["role"], "user");
    assert_eq!(turns[1]["content"], "What color is the sky?");

    let (_, body) = send(&app, get(&format!("/sessions/{id}/conversation?order=oldest"))).await;
    assert_eq!(body["order"], "oldest");
    assert_eq!(body["turns"][0]["role"], "user");

    let (_, body) = send(&app, get(&format!("/sessions/{id}"))).await;
    assert_eq!(body["pdf_processed"], true);
    assert_eq!(body["engine"], "extractive");
    assert_eq!(body["turns"], 2);
}

#[tokio::test]
async fn ask_before_upload_is_conflict() {
    let app = app();
    let id = new_session(&app).await;
    let (status, body) = send(
        &app,
        json_request("POST", &format!("/sessions/{id}/ask"), json!({ "question": "Anything?" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("no processed documents"));

    let (_, body) = send(&app, get(&format!("/sessions/{id}/conversation"))).await;
    assert_eq!(body["turns"], json!([]));
}

#[tokio::test]
async fn blank_question_is_bad_request() {
    let app = app();
    let id = new_session(&app).await;
    send(&app, upload(&id, &[("a.txt", "Some text.")])).await;
    let (status, _) = send(
        &app,
        json_request("POST", &format!("/sessions/{id}/ask"), json!({ "question": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unmatched_question_is_unprocessable() {
    let app = app();
    let id = new_session(&app).await;
    send(&app, upload(&id, &[("sky.txt", "The sky is blue.")])).await;
    let (status, _) = send(
        &app,
        json_request("POST", &format!("/sessions/{id}/ask"), json!({ "question": "Who wrote Hamlet?" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, get(&format!("/sessions/{id}"))).await;
    assert_eq!(body["turns"], 0);
    assert_eq!(body["pending_question"], "Who wrote Hamlet?");
}

#[tokio::test]
async fn blank_upload_leaves_session_unprocessed() {
    let app = app();
    let id = new_session(&app).await;
    send(&app, upload(&id, &[("a.txt", "First corpus.")])).await;

    let (status, body) = send(&app, upload(&id, &[("blank.txt", "   ")])).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("no text"));

    let (_, body) = send(&app, get(&format!("/sessions/{id}"))).await;
    assert_eq!(body["pdf_processed"], false);
    assert_eq!(body["corpus_chars"], 0);
    assert_eq!(body["engine"], Value::Null);
}

#[tokio::test]
async fn upload_without_files_is_bad_request() {
    let app = app();
    let id = new_session(&app).await;
    let (status, _) = send(&app, upload(&id, &[])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn hosted_provider_without_key_is_rejected_before_processing() {
    let app = app();
    let id = new_session(&app).await;
    let (status, _) = send(
        &app,
        json_request("PUT", &format!("/sessions/{id}/settings"), json!({ "provider": "openai" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, upload(&id, &[("a.txt", "Some text.")])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("openai"));
}

#[tokio::test]
async fn settings_hide_keys_and_reject_unknown_values() {
    let app = app();
    let id = new_session(&app).await;
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/sessions/{id}/settings"),
            json!({ "provider": "cohere", "api_key": "co-secret", "personality": "academic", "temperature": 0.2 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], "cohere");
    assert_eq!(body["personality"], "academic");
    assert_eq!(body["api_key_set"]["cohere"], true);
    assert!(!body.to_string().contains("co-secret"));

    let (status, _) = send(
        &app,
        json_request("PUT", &format!("/sessions/{id}/settings"), json!({ "provider": "gpt-99" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analytics_for_multiple_files() {
    let app = app();
    let id = new_session(&app).await;
    send(
        &app,
        json_request(
            "PUT",
            &format!("/sessions/{id}/settings"),
            json!({ "analytics_enabled": true, "display_word_count": true, "display_char_count": true }),
        ),
    )
    .await;

    let (status, body) = send(&app, upload(&id, &[("foo.txt", "foo foo"), ("bar.txt", "bar")])).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let docs = body["analytics"]["documents"].as_array().unwrap();
    assert_eq!(docs[0]["name"], "foo.txt");
    assert_eq!(docs[0]["word_count"], 2);
    assert_eq!(docs[1]["word_count"], 1);
    assert_eq!(body["analytics"]["collective"]["name"], "Collective Summary");
    assert_eq!(body["analytics"]["collective"]["word_count"], 3);
    assert!(docs[0].get("sentiment").is_none());
}

#[tokio::test]
async fn uploaded_names_are_sanitised() {
    let app = app();
    let id = new_session(&app).await;
    let (status, body) = send(&app, upload(&id, &[("../../etc/notes.txt", "Hello there.")])).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["documents"], json!(["etc_notes.txt"]));
}

#[tokio::test]
async fn delete_then_missing() {
    let app = app();
    let id = new_session(&app).await;
    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/sessions/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, get(&format!("/sessions/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn docs_are_served() {
    let app = app();
    let resp = app.oneshot(get("/docs")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

/// Answers only once released, announcing when the call has started.
struct GatedEngine {
    started: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl AnswerEngine for GatedEngine {
    async fn answer(&self, _corpus: &str, _question: &str) -> Result<String, AnswerError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok("released".into())
    }

    fn provider(&self) -> Provider {
        Provider::Ollama
    }
}

#[tokio::test]
async fn session_stays_readable_while_answering() {
    let state = Arc::new(AppState::new(Config::default()));
    let app = build_router(state.clone());
    let id = SessionId::new_v4();
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    {
        let (session, _) = state.sessions.initialize(id).await;
        let mut s = session.lock().await;
        s.pdf_processed = true;
        s.pdf_content = "Some corpus.\n".into();
        s.conversation = Some(Arc::new(GatedEngine {
            started: started.clone(),
            release: release.clone(),
        }));
    }

    let asking = tokio::spawn({
        let app = app.clone();
        async move {
            send(
                &app,
                json_request("POST", &format!("/sessions/{id}/ask"), json!({ "question": "Why?" })),
            )
            .await
        }
    });
    started.notified().await;

    let (status, body) = tokio::time::timeout(
        Duration::from_secs(5),
        send(&app, get(&format!("/sessions/{id}/conversation"))),
    )
    .await
    .expect("conversation readable during the backend call");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turns"], json!([]));
    let (_, body) = send(&app, get(&format!("/sessions/{id}"))).await;
    assert_eq!(body["pending_question"], "Why?");

    release.notify_one();
    let (status, body) = asking.await.unwrap();
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["answer"], "released");
    assert_eq!(body["conversation"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn reupload_during_answer_discards_it() {
    let state = Arc::new(AppState::new(Config::default()));
    let app = build_router(state.clone());
    let id = SessionId::new_v4();
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    {
        let (session, _) = state.sessions.initialize(id).await;
        let mut s = session.lock().await;
        s.pdf_processed = true;
        s.pdf_content = "Old corpus.\n".into();
        s.conversation = Some(Arc::new(GatedEngine {
            started: started.clone(),
            release: release.clone(),
        }));
    }

    let asking = tokio::spawn({
        let app = app.clone();
        async move {
            send(
                &app,
                json_request("POST", &format!("/sessions/{id}/ask"), json!({ "question": "Why?" })),
            )
            .await
        }
    });
    started.notified().await;

    let (status, _) = send(&app, upload(&id.to_string(), &[("new.txt", "New corpus.")])).await;
    assert_eq!(status, StatusCode::OK);

    release.notify_one();
    let (status, _) = asking.await.unwrap();
    assert_eq!(status, StatusCode::CONFLICT);
    let (_, body) = send(&app, get(&format!("/sessions/{id}/conversation"))).await;
    assert_eq!(body["turns"], json!([]));
}
