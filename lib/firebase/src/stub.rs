//! In-process stand-in for the Identity Toolkit and Firestore REST APIs.

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{FirebaseBackend, FirebaseConfig, FirestoreProfileStore, IdentityToolkitClient};

#[derive(Default)]
struct StubState {
    accounts: Mutex<HashMap<String, (String, String)>>,
    documents: Mutex<HashMap<String, String>>,
    last_api_key: Mutex<Option<String>>,
    last_bearer: Mutex<Option<String>>,
    fail_documents: Mutex<bool>,
}

pub(crate) struct Stub {
    base: String,
    state: Arc<StubState>,
}

impl Stub {
    pub(crate) const API_KEY: &'static str = "stub-api-key";

    pub(crate) async fn spawn() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub");
        let addr = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });
        Self {
            base: format!("http://{addr}"),
            state,
        }
    }

    pub(crate) fn token_for(uid: &str) -> String {
        format!("token-{uid}")
    }

    pub(crate) fn config(&self) -> FirebaseConfig {
        FirebaseConfig::new(Self::API_KEY.to_string(), "demo".to_string()).with_base_urls(
            format!("{}/identitytoolkit/v1", self.base),
            format!("{}/firestore/v1", self.base),
        )
    }

    pub(crate) fn identity_client(&self) -> IdentityToolkitClient {
        IdentityToolkitClient::with_http(reqwest::Client::new(), &self.config())
    }

    pub(crate) fn backend(&self) -> (Arc<IdentityToolkitClient>, Arc<FirestoreProfileStore>) {
        let backend = FirebaseBackend::connect(&self.config()).expect("backend");
        (backend.identity, backend.profiles)
    }

    pub(crate) fn last_api_key(&self) -> Option<String> {
        self.state.last_api_key.lock().expect("lock").clone()
    }

    pub(crate) fn last_bearer(&self) -> Option<String> {
        self.state.last_bearer.lock().expect("lock").clone()
    }

    pub(crate) fn fail_documents(&self, fail: bool) {
        *self.state.fail_documents.lock().expect("lock") = fail;
    }

    pub(crate) fn insert_raw_document(&self, uid: &str, body: &str) {
        self.state
            .documents
            .lock()
            .expect("lock")
            .insert(uid.to_string(), body.to_string());
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path();
    if let Some(endpoint) = path.strip_prefix("/identitytoolkit/v1/") {
        let key = uri
            .query()
            .and_then(|q| q.split('&').find_map(|pair| pair.strip_prefix("key=")))
            .map(str::to_string);
        *state.last_api_key.lock().expect("lock") = key;
        let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        return accounts(&state, endpoint, &request);
    }

    if let Some((_, uid)) = path.rsplit_once("/documents/users/") {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string);
        *state.last_bearer.lock().expect("lock") = bearer;
        if *state.fail_documents.lock().expect("lock") {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        return documents(&state, &method, uid, &body);
    }

    StatusCode::NOT_FOUND.into_response()
}

fn accounts(state: &StubState, endpoint: &str, request: &Value) -> Response {
    let email = request["email"].as_str().unwrap_or_default().to_string();
    let password = request["password"].as_str().unwrap_or_default().to_string();
    let mut accounts = state.accounts.lock().expect("lock");

    let uid = match endpoint {
        "accounts:signUp" => {
            if !email.contains('@') {
                return toolkit_error("INVALID_EMAIL");
            }
            if password.chars().count() < 6 {
                return toolkit_error("WEAK_PASSWORD : Password should be at least 6 characters");
            }
            if accounts.contains_key(&email) {
                return toolkit_error("EMAIL_EXISTS");
            }
            let uid = format!("uid-{}", accounts.len() + 1);
            accounts.insert(email.clone(), (uid.clone(), password));
            uid
        }
        "accounts:signInWithPassword" => match accounts.get(&email) {
            None => return toolkit_error("EMAIL_NOT_FOUND"),
            Some((_, stored)) if *stored != password => {
                return toolkit_error("INVALID_LOGIN_CREDENTIALS");
            }
            Some((uid, _)) => uid.clone(),
        },
        _ => return StatusCode::NOT_FOUND.into_response(),
    };

    Json(json!({
        "kind": "identitytoolkit#VerifyPasswordResponse",
        "localId": uid,
        "email": email,
        "idToken": Stub::token_for(&uid),
        "refreshToken": "refresh",
        "expiresIn": "3600",
    }))
    .into_response()
}

fn toolkit_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": { "code": 400, "message": message, "errors": [] } })),
    )
        .into_response()
}

fn documents(state: &StubState, method: &Method, uid: &str, body: &[u8]) -> Response {
    let mut documents = state.documents.lock().expect("lock");
    if *method == Method::GET {
        return match documents.get(uid) {
            Some(stored) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                stored.clone(),
            )
                .into_response(),
            None => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": { "code": 404, "status": "NOT_FOUND" } })),
            )
                .into_response(),
        };
    }
    if *method == Method::PATCH {
        let stored = String::from_utf8_lossy(body).into_owned();
        documents.insert(uid.to_string(), stored.clone());
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            stored,
        )
            .into_response();
    }
    StatusCode::METHOD_NOT_ALLOWED.into_response()
}
