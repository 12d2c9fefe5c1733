//! An in-process stand-in for the tracking API, bound to a random port.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{Value, json};

use baggage_client::models::session::Session;
use baggage_client::models::user::{Role, User};
use baggage_client::{ApiClient, MemoryStore, SessionStore};

pub const PASSWORD: &str = "secret1";
pub const BAG_ID: &str = "a8c74a09-1111-4222-8333-444455556666";
pub const BAG_CODE: &str = "BAG-A8C74A09";

/// How the fake server treats tokens and failures.
#[derive(Clone)]
pub struct Behaviour {
    /// Access tokens accepted from the start.
    pub valid_access: Vec<&'static str>,
    /// Refresh tokens the refresh endpoint accepts.
    pub valid_refresh: Vec<&'static str>,
    /// The access token handed out by a successful refresh.
    pub refreshed_access: &'static str,
    /// Protected endpoints answer 401 whatever the token.
    pub reject_all: bool,
    /// The logout endpoint answers 500.
    pub logout_fails: bool,
    /// Raw `200` body the refresh endpoint answers with instead of a token.
    pub refresh_body: Option<&'static str>,
    /// How long the refresh endpoint stalls before answering.
    pub refresh_delay: Option<Duration>,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            valid_access: Vec::new(),
            valid_refresh: vec!["R1"],
            refreshed_access: "A2",
            reject_all: false,
            logout_fails: false,
            refresh_body: None,
            refresh_delay: None,
        }
    }
}

/// One request as seen by the server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

struct FakeState {
    behaviour: Behaviour,
    valid_access: Mutex<HashSet<String>>,
    requests: Mutex<Vec<Recorded>>,
    refresh_calls: AtomicUsize,
}

pub struct FakeApi {
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeApi {
    pub async fn start(behaviour: Behaviour) -> Self {
        let state = Arc::new(FakeState {
            valid_access: Mutex::new(
                behaviour.valid_access.iter().map(|t| t.to_string()).collect(),
            ),
            behaviour,
            requests: Mutex::new(Vec::new()),
            refresh_calls: AtomicUsize::new(0),
        });

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    /// A client talking to this server through `store`.
    pub fn client(&self, store: Arc<dyn SessionStore>) -> ApiClient {
        ApiClient::with_http(&self.base_url, reqwest::Client::new(), store)
    }

    /// Like [`FakeApi::client`], giving up on any request after `timeout`.
    pub fn client_with_timeout(&self, store: Arc<dyn SessionStore>, timeout: Duration) -> ApiClient {
        let http = reqwest::Client::builder().timeout(timeout).build().unwrap();
        ApiClient::with_http(&self.base_url, http, store)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests to `path`, relative to `/api`.
    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }
}

pub fn passenger() -> User {
    User {
        id: 7,
        username: "amina".into(),
        email: "amina@example.com".into(),
        first_name: Some("Amina".into()),
        last_name: Some("Nakato".into()),
        role: Role::Passenger,
        employee_id: None,
        department: None,
        is_staff_member: false,
        can_update_baggage_status: Some(false),
    }
}

/// A memory store already holding `access`/`refresh` for [`passenger`].
pub fn signed_in_store(access: &str, refresh: &str) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .save(&Session::new(access, refresh), &passenger())
        .unwrap();
    store
}

fn user_json(username: &str) -> Value {
    let staff = username.starts_with("staff");
    json!({
        "id": if staff { 3 } else { 7 },
        "username": username,
        "email": format!("{}@example.com", username),
        "first_name": "",
        "last_name": "",
        "role": if staff { "STAFF" } else { "PASSENGER" },
        "employee_id": if staff { json!("EMP001") } else { Value::Null },
        "department": if staff { json!("Ground Handling") } else { Value::Null },
        "is_staff_member": staff,
        "can_update_baggage_status": staff,
    })
}

fn status_update_json(id: i64, status: &str, display: &str, timestamp: &str, location: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "status_display": display,
        "timestamp": timestamp,
        "updated_by": 3,
        "updated_by_name": "staff1",
        "notes": "",
        "location": location,
    })
}

pub fn bag_json() -> Value {
    json!({
        "id": BAG_ID,
        "passenger_name": "Amina Nakato",
        "passenger_email": "amina@example.com",
        "flight_number": "UR101",
        "destination": "Nairobi",
        "qr_code": BAG_CODE,
        "qr_code_image_url": null,
        "current_status": "LOADED",
        "current_status_display": "Loaded",
        "created_at": "2025-03-01T08:00:00Z",
        "updated_at": "2025-03-01T09:30:00Z",
        "status_timeline": [
            status_update_json(1, "CHECKED_IN", "Checked In", "2025-03-01T08:00:00Z", "Check-in desk 4"),
            status_update_json(2, "SECURITY_CLEARED", "Security Cleared", "2025-03-01T08:45:00Z", "Screening"),
            status_update_json(3, "LOADED", "Loaded", "2025-03-01T09:30:00Z", "Gate 2"),
        ],
    })
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn unauthorized() -> Response {
    reply(
        StatusCode::UNAUTHORIZED,
        json!({"detail": "Given token not valid for any token type", "code": "token_not_valid"}),
    )
}

enum Caller {
    Anonymous,
    Authenticated,
}

impl FakeState {
    /// Mirrors JWT authentication: a missing header is anonymous, a bad one
    /// is rejected outright.
    fn authenticate(&self, headers: &HeaderMap) -> Result<Caller, Response> {
        let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
            return Ok(Caller::Anonymous);
        };
        let token = value.strip_prefix("Bearer ").unwrap_or_default();
        if !self.behaviour.reject_all && self.valid_access.lock().unwrap().contains(token) {
            Ok(Caller::Authenticated)
        } else {
            Err(unauthorized())
        }
    }

    fn require_auth(&self, headers: &HeaderMap) -> Result<(), Response> {
        match self.authenticate(headers)? {
            Caller::Authenticated => Ok(()),
            Caller::Anonymous => Err(reply(
                StatusCode::UNAUTHORIZED,
                json!({"detail": "Authentication credentials were not provided."}),
            )),
        }
    }

    fn issue_tokens(&self, username: &str) -> Value {
        self.valid_access.lock().unwrap().insert("A1".to_string());
        json!({
            "user": user_json(username),
            "tokens": {"access": "A1", "refresh": "R1"},
            "message": "Login successful",
        })
    }
}

async fn handle(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().strip_prefix("/api").unwrap_or(uri.path()).to_string();
    state.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });

    if let (Some(delay), "/auth/refresh/") = (state.behaviour.refresh_delay, path.as_str()) {
        tokio::time::sleep(delay).await;
    }

    match route(&state, &method, &path, &headers, &body) {
        Ok(response) | Err(response) => response,
    }
}

fn route(
    state: &FakeState,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    body: &str,
) -> Result<Response, Response> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let payload: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    let response = match (method.as_str(), segments.as_slice()) {
        ("GET", ["health"]) => reply(
            StatusCode::OK,
            json!({"status": "healthy", "service": "Baggage Tracking API", "version": "1.0.0"}),
        ),
        ("POST", ["auth", "refresh"]) => {
            state.refresh_calls.fetch_add(1, Ordering::SeqCst);
            let refresh = payload["refresh"].as_str().unwrap_or_default();
            if let Some(raw) = state.behaviour.refresh_body {
                (
                    StatusCode::OK,
                    [(axum::http::header::CONTENT_TYPE, "application/json")],
                    raw,
                )
                    .into_response()
            } else if state.behaviour.valid_refresh.contains(&refresh) {
                let access = state.behaviour.refreshed_access;
                state.valid_access.lock().unwrap().insert(access.to_string());
                reply(StatusCode::OK, json!({"access": access}))
            } else {
                reply(
                    StatusCode::UNAUTHORIZED,
                    json!({"detail": "Token is invalid or expired", "code": "token_not_valid"}),
                )
            }
        }
        ("POST", ["auth", endpoint @ ("login" | "staff-login")]) => {
            let username = payload["username"].as_str().unwrap_or_default();
            if payload["password"].as_str() != Some(PASSWORD) {
                reply(StatusCode::UNAUTHORIZED, json!({"error": "Invalid credentials"}))
            } else if *endpoint == "staff-login" && !username.starts_with("staff") {
                reply(
                    StatusCode::FORBIDDEN,
                    json!({"error": "Access denied. Staff credentials required."}),
                )
            } else {
                reply(StatusCode::OK, state.issue_tokens(username))
            }
        }
        ("POST", ["auth", "register"]) => {
            let username = payload["username"].as_str().unwrap_or_default();
            if username == "taken" {
                reply(
                    StatusCode::BAD_REQUEST,
                    json!({"username": ["A user with that username already exists."]}),
                )
            } else {
                reply(StatusCode::CREATED, state.issue_tokens(username))
            }
        }
        ("POST", ["auth", "logout"]) => {
            state.require_auth(headers)?;
            if state.behaviour.logout_fails {
                reply(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"}))
            } else {
                reply(StatusCode::OK, json!({"message": "Successfully logged out"}))
            }
        }
        ("GET", ["auth", "user"]) => {
            state.require_auth(headers)?;
            reply(StatusCode::OK, json!({"user": user_json("amina")}))
        }
        ("GET", ["baggage", "qr", code]) => {
            state.authenticate(headers)?;
            if *code == BAG_CODE {
                reply(StatusCode::OK, bag_json())
            } else {
                reply(StatusCode::NOT_FOUND, json!({"error": "not found"}))
            }
        }
        ("GET", ["baggage"]) => {
            state.require_auth(headers)?;
            reply(
                StatusCode::OK,
                json!({"count": 1, "next": null, "previous": null, "results": [bag_json()]}),
            )
        }
        ("POST", ["baggage"]) => {
            state.require_auth(headers)?;
            let mut bag = bag_json();
            bag["passenger_name"] = payload["passenger_name"].clone();
            bag["flight_number"] = payload["flight_number"].clone();
            bag["current_status"] = json!("CHECKED_IN");
            bag["current_status_display"] = json!("Checked In");
            bag["status_timeline"] = json!([bag_json()["status_timeline"][0].clone()]);
            reply(
                StatusCode::CREATED,
                json!({"message": "Baggage created successfully", "baggage": bag}),
            )
        }
        ("GET", ["baggage", id]) => {
            state.require_auth(headers)?;
            if *id == BAG_ID {
                reply(StatusCode::OK, bag_json())
            } else {
                reply(StatusCode::NOT_FOUND, json!({"error": "Baggage not found"}))
            }
        }
        ("POST", ["baggage", id, "update"]) => {
            state.require_auth(headers)?;
            if *id != BAG_ID {
                reply(StatusCode::NOT_FOUND, json!({"error": "Baggage not found"}))
            } else if payload["status"] != json!("IN_FLIGHT") {
                reply(
                    StatusCode::BAD_REQUEST,
                    json!({"status": ["Status must follow the handling order."]}),
                )
            } else {
                let update = status_update_json(
                    4,
                    "IN_FLIGHT",
                    "In-Flight",
                    "2025-03-01T10:15:00Z",
                    payload["location"].as_str().unwrap_or_default(),
                );
                let mut bag = bag_json();
                bag["current_status"] = json!("IN_FLIGHT");
                bag["current_status_display"] = json!("In-Flight");
                bag["status_timeline"]
                    .as_array_mut()
                    .unwrap()
                    .push(update.clone());
                reply(
                    StatusCode::OK,
                    json!({
                        "message": "Status updated successfully",
                        "baggage": bag,
                        "status_update": update,
                    }),
                )
            }
        }
        ("GET", ["baggage", id, "timeline"]) => {
            state.require_auth(headers)?;
            if *id != BAG_ID {
                reply(StatusCode::NOT_FOUND, json!({"error": "Baggage not found"}))
            } else {
                let bag = bag_json();
                reply(
                    StatusCode::OK,
                    json!({
                        "baggage_id": BAG_ID,
                        "qr_code": BAG_CODE,
                        "passenger_name": bag["passenger_name"],
                        "current_status": bag["current_status"],
                        "timeline": bag["status_timeline"],
                    }),
                )
            }
        }
        ("GET", ["staff", "dashboard", "stats"]) => {
            state.require_auth(headers)?;
            reply(
                StatusCode::OK,
                json!({
                    "total_baggage": 5,
                    "status_counts": {
                        "CHECKED_IN": {"count": 1, "display": "Checked In"},
                        "SECURITY_CLEARED": {"count": 1, "display": "Security Cleared"},
                        "LOADED": {"count": 2, "display": "Loaded"},
                        "IN_FLIGHT": {"count": 0, "display": "In-Flight"},
                        "ARRIVED": {"count": 1, "display": "Arrived"},
                    },
                    "recent_updates": bag_json()["status_timeline"],
                }),
            )
        }
        _ => reply(StatusCode::NOT_FOUND, json!({"detail": "Not found."})),
    };

    Ok(response)
}
