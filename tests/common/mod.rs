#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use gmail_quickstart::config::AuthConfig;
use gmail_quickstart::prompt::Prompt;
use serde_json::json;
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

pub const ACCESS_TOKEN: &str = "access-from-exchange";
pub const REFRESHED_TOKEN: &str = "access-from-refresh";
pub const AUTH_CODE: &str = "ABC123";
// base64url of [0x00, 0xff, 0x10, 0x80, 0x7f, 0xfe]
pub const ATTACHMENT_DATA: &str = "AP8QgH_-";
pub const ATTACHMENT_BYTES: [u8; 6] = [0x00, 0xff, 0x10, 0x80, 0x7f, 0xfe];

#[derive(Clone, Default)]
pub struct MockGoogle {
    pub token_requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
    pub api_requests: Arc<Mutex<Vec<String>>>,
}

impl MockGoogle {
    pub fn token_requests(&self) -> Vec<HashMap<String, String>> {
        self.token_requests.lock().unwrap().clone()
    }

    pub fn api_requests(&self) -> Vec<String> {
        self.api_requests.lock().unwrap().clone()
    }
}

pub struct MockServer {
    pub addr: SocketAddr,
    pub google: MockGoogle,
}

impl MockServer {
    pub async fn start() -> Self {
        let google = MockGoogle::default();
        let app = Router::new()
            .route("/token", post(token))
            .route("/gmail/v1/users/{user}/messages", get(list_messages))
            .route("/gmail/v1/users/{user}/messages/{id}", get(get_message))
            .route(
                "/gmail/v1/users/{user}/messages/{id}/attachments/{attachment_id}",
                get(get_attachment),
            )
            .with_state(google.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, google }
    }

    pub fn token_uri(&self) -> String {
        format!("http://{}/token", self.addr)
    }

    pub fn api_base_url(&self) -> String {
        format!("http://{}/gmail/v1", self.addr)
    }

    pub fn auth_config(&self) -> AuthConfig {
        let secret = json!({
            "installed": {
                "client_id": "client-123.apps.googleusercontent.com",
                "client_secret": "shh",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": self.token_uri(),
                "redirect_uris": ["urn:ietf:wg:oauth:2.0:oob"]
            }
        });
        AuthConfig::from_json(
            &secret.to_string(),
            vec!["https://www.googleapis.com/auth/gmail.readonly".to_string()],
        )
        .unwrap()
    }
}

async fn token(
    State(google): State<MockGoogle>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    google.token_requests.lock().unwrap().push(form.clone());

    match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") if form.get("code").map(String::as_str) == Some(AUTH_CODE) => {
            Json(json!({
                "access_token": ACCESS_TOKEN,
                "token_type": "Bearer",
                "expires_in": 3599,
                "refresh_token": "1//refresh",
                "scope": "https://www.googleapis.com/auth/gmail.readonly"
            }))
            .into_response()
        }
        Some("refresh_token") if form.get("refresh_token").map(String::as_str) == Some("1//refresh") => {
            Json(json!({
                "access_token": REFRESHED_TOKEN,
                "token_type": "Bearer",
                "expires_in": 3599
            }))
            .into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Malformed auth code."
            })),
        )
            .into_response(),
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let value = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    value == format!("Bearer {}", ACCESS_TOKEN) || value == format!("Bearer {}", REFRESHED_TOKEN)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": {"code": 401, "message": "Invalid Credentials"}})),
    )
        .into_response()
}

async fn list_messages(
    State(google): State<MockGoogle>,
    Path(user): Path<String>,
    headers: HeaderMap,
) -> Response {
    google
        .api_requests
        .lock()
        .unwrap()
        .push(format!("list:{}", user));
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "messages": [
            {"id": "m1", "threadId": "t1"},
            {"id": "m2", "threadId": "t2"}
        ],
        "resultSizeEstimate": 2
    }))
    .into_response()
}

async fn get_message(
    State(google): State<MockGoogle>,
    Path((user, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    google
        .api_requests
        .lock()
        .unwrap()
        .push(format!("get:{}:{}", user, id));
    if !authorized(&headers) {
        return unauthorized();
    }
    if id != "m1" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"code": 404, "message": "Requested entity was not found."}})),
        )
            .into_response();
    }
    Json(json!({
        "id": "m1",
        "threadId": "t1",
        "labelIds": ["INBOX"],
        "snippet": "Files attached",
        "historyId": "4242",
        "internalDate": "1700000000000",
        "sizeEstimate": 4096,
        "payload": {
            "mimeType": "multipart/mixed",
            "headers": [
                {"name": "From", "value": "alice@example.com"},
                {"name": "Subject", "value": "Files"}
            ],
            "parts": [
                {
                    "partId": "0",
                    "mimeType": "text/html",
                    "filename": "",
                    "body": {"size": 12, "data": "PHA-RmlsZXM8L3A-"}
                },
                {
                    "partId": "1",
                    "mimeType": "application/octet-stream",
                    "filename": "payload.bin",
                    "body": {"attachmentId": "att-1", "size": 6}
                }
            ]
        }
    }))
    .into_response()
}

async fn get_attachment(
    State(google): State<MockGoogle>,
    Path((user, id, attachment_id)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    google
        .api_requests
        .lock()
        .unwrap()
        .push(format!("attachment:{}:{}:{}", user, id, attachment_id));
    if !authorized(&headers) {
        return unauthorized();
    }
    match attachment_id.as_str() {
        "broken" => return Json(json!({"size": 3, "data": "***"})).into_response(),
        "empty" => return Json(json!({"attachmentId": "empty", "size": 0})).into_response(),
        "no-data" => return Json(json!({"attachmentId": "no-data", "size": 6})).into_response(),
        _ => {}
    }
    Json(json!({"attachmentId": attachment_id, "size": 6, "data": ATTACHMENT_DATA})).into_response()
}

/// Prompt that answers from a script and records what it was asked.
pub struct ScriptedPrompt {
    answers: Vec<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().rev().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, message: &str) -> io::Result<String> {
        self.asked.push(message.to_string());
        self.answers.pop().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "script has no more answers")
        })
    }
}
