// tests/http_presence_test.rs — Integration test: REST client against a mock backend

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use specialist_desk::presence::http::HttpPresenceClient;
use specialist_desk::presence::{
    ActiveChatsSource, PresenceClient, PresenceError, SpecialistStatus,
};
use specialist_desk::session::{SessionController, SessionError};

#[derive(Clone, Default)]
struct Recorded {
    status_writes: Arc<Mutex<Vec<(String, Value)>>>,
    auth_headers: Arc<Mutex<Vec<String>>>,
}

async fn get_specialist(
    State(rec): State<Recorded>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        rec.auth_headers.lock().unwrap().push(auth.to_string());
    }
    match id.as_str() {
        "known" | "flaky" => Ok(Json(json!({
            "id": id,
            "name": "ravi",
            "status": "away",
            "maxConcurrentChats": 3
        }))),
        "garbled" => Ok(Json(json!({"unexpected": true}))),
        "down" => Err(StatusCode::SERVICE_UNAVAILABLE),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn put_status(
    State(rec): State<Recorded>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    rec.status_writes.lock().unwrap().push((id.clone(), body));
    match id.as_str() {
        "known" => StatusCode::NO_CONTENT,
        "flaky" => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::NOT_FOUND,
    }
}

async fn get_chats(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    if id != "known" {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!([
        {"id": "c2", "createdAt": "2026-04-01T10:00:00Z"},
        {
            "id": "c1",
            "createdAt": "2026-04-01T09:00:00Z",
            "userInfo": {"name": "Tomasz"},
            "context": {"botTranscript": [{"role": "bot", "content": "hello"}]}
        }
    ])))
}

/// Serve the mock backend on an ephemeral port; returns its base URL.
async fn spawn_backend(rec: Recorded) -> String {
    let app = Router::new()
        .route("/api/specialists/{id}", get(get_specialist))
        .route("/api/specialists/{id}/status", put(put_status))
        .route("/api/specialists/{id}/chats", get(get_chats))
        .with_state(rec);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

#[tokio::test]
async fn test_get_specialist_found_and_missing() {
    let base = spawn_backend(Recorded::default()).await;
    let client = HttpPresenceClient::new(&base, None).unwrap();

    let profile = client.get_specialist("known").await.unwrap().unwrap();
    assert_eq!(profile.name, "ravi");
    assert_eq!(profile.max_concurrent_chats, 3);
    // "away" is not part of the closed set.
    assert_eq!(profile.status, SpecialistStatus::Unknown);

    assert!(client.get_specialist("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_specialist_errors() {
    let base = spawn_backend(Recorded::default()).await;
    let client = HttpPresenceClient::new(&base, None).unwrap();

    let err = client.get_specialist("down").await.unwrap_err();
    assert!(matches!(err, PresenceError::Status { code: 503, .. }));

    let err = client.get_specialist("garbled").await.unwrap_err();
    assert!(matches!(err, PresenceError::Decode(_)));
}

#[tokio::test]
async fn test_status_write_body_and_auth() {
    let rec = Recorded::default();
    let base = spawn_backend(rec.clone()).await;
    let client = HttpPresenceClient::new(&base, Some("tok-123".into())).unwrap();

    client
        .update_specialist_status("known", SpecialistStatus::Busy)
        .await
        .unwrap();
    client.get_specialist("known").await.unwrap();

    let writes = rec.status_writes.lock().unwrap().clone();
    assert_eq!(writes, vec![("known".to_string(), json!({"status": "busy"}))]);
    assert_eq!(
        rec.auth_headers.lock().unwrap().clone(),
        vec!["Bearer tok-123".to_string()]
    );
}

#[tokio::test]
async fn test_status_write_failures() {
    let base = spawn_backend(Recorded::default()).await;
    let client = HttpPresenceClient::new(&base, None).unwrap();

    let err = client
        .update_specialist_status("flaky", SpecialistStatus::Online)
        .await
        .unwrap_err();
    assert!(matches!(err, PresenceError::Status { code: 500, .. }));

    let err = client
        .update_specialist_status("nobody", SpecialistStatus::Offline)
        .await
        .unwrap_err();
    assert!(matches!(err, PresenceError::UnknownSpecialist(ref id) if id == "nobody"));
}

#[tokio::test]
async fn test_active_chats_keep_server_order() {
    let base = spawn_backend(Recorded::default()).await;
    let client = HttpPresenceClient::new(&base, None).unwrap();

    let chats = client.active_chats("known").await.unwrap();
    let ids: Vec<&str> = chats.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c2", "c1"]);
    assert_eq!(chats[0].customer_name(), "Customer");
    assert_eq!(chats[0].preview(), "New chat request");
    assert_eq!(chats[1].customer_name(), "Tomasz");
    assert_eq!(chats[1].preview(), "Chat in progress");
}

#[tokio::test]
async fn test_transport_error_when_backend_unreachable() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpPresenceClient::new(&format!("http://{addr}"), None).unwrap();
    let err = client.get_specialist("known").await.unwrap_err();
    assert!(matches!(err, PresenceError::Transport(_)));
}

#[tokio::test]
async fn test_controller_over_http() {
    let rec = Recorded::default();
    let base = spawn_backend(rec.clone()).await;
    let client = Arc::new(HttpPresenceClient::new(&base, None).unwrap());

    let mut controller = SessionController::new(client.clone());
    controller.set_specialist("known").unwrap();
    let state = controller.settled().await;
    assert_eq!(state.specialist.unwrap().status, SpecialistStatus::Online);

    controller.deactivate().wait().await;
    let bodies: Vec<Value> = rec
        .status_writes
        .lock()
        .unwrap()
        .iter()
        .map(|(_, body)| body.clone())
        .collect();
    assert_eq!(
        bodies,
        vec![json!({"status": "online"}), json!({"status": "offline"})]
    );

    // Online write rejected by the backend surfaces as the generic error.
    let mut flaky = SessionController::new(client);
    flaky.set_specialist("flaky").unwrap();
    assert_eq!(flaky.settled().await.error, Some(SessionError::Unexpected));
}
