//! Registry API endpoints
//!
//! Decodes request bodies, invokes the registry service, and maps the
//! error taxonomy onto status codes: `InvalidArgument` → 400, `NotFound`
//! → 404, everything else (duplicate ids, storage failures) → 500.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::ApiState;
use crate::db::ClientRecord;
use crate::registry::{self, HeartbeatRequest, PingRequest, RegisterRequest};
use crate::Error;

/// Error body shared by all failure responses
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Successful registration response
#[derive(Serialize)]
struct RegisterResponse {
    client_id: String,
}

/// Client enumeration response
#[derive(Serialize)]
struct ClientsResponse {
    clients: Vec<ClientRecord>,
}

/// Heartbeat acknowledgment
#[derive(Serialize)]
struct HeartbeatResponse {
    ok: bool,
}

/// Body rejected before reaching the service (not JSON at all)
#[derive(Serialize)]
struct NotJsonBody {
    received: bool,
    error: &'static str,
}

/// Build registry routes
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/ping", post(ping))
        .route("/v1/register", post(register))
        .route("/v1/clients", get(list_clients))
        .route("/v1/clients/{client_id}", get(get_client))
        .route("/v1/heartbeat", post(heartbeat))
        .with_state(state)
}

fn error_response(err: &Error) -> Response {
    let (status, message) = match err {
        Error::InvalidArgument(field) => (
            StatusCode::BAD_REQUEST,
            format!("Missing or invalid '{field}'"),
        ),
        Error::NotFound(_) => (StatusCode::NOT_FOUND, "Client not found".to_string()),
        other => {
            tracing::error!(error = %other, "registry request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    };

    (status, Json(ErrorBody { error: message })).into_response()
}

fn expected_json_body() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: "Expected JSON body".to_string(),
        }),
    )
        .into_response()
}

/// Stateless reachability probe
async fn ping(body: Result<Json<PingRequest>, JsonRejection>) -> Response {
    match body {
        Ok(Json(req)) => Json(registry::ping(req)).into_response(),
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(NotJsonBody {
                received: false,
                error: "Expected JSON body",
            }),
        )
            .into_response(),
    }
}

/// Register a new client
async fn register(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = body else {
        return expected_json_body();
    };

    match state.registry.register(req) {
        Ok(client_id) => {
            (StatusCode::CREATED, Json(RegisterResponse { client_id })).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// List all registered clients, newest first
async fn list_clients(State(state): State<Arc<ApiState>>) -> Response {
    match state.registry.list_clients() {
        Ok(clients) => Json(ClientsResponse { clients }).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Fetch a single client record
async fn get_client(
    State(state): State<Arc<ApiState>>,
    Path(client_id): Path<String>,
) -> Response {
    match state.registry.get_client(&client_id) {
        Ok(record) => Json(record).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Record a client heartbeat
async fn heartbeat(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<HeartbeatRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = body else {
        return expected_json_body();
    };

    match state.registry.heartbeat(req) {
        Ok(()) => Json(HeartbeatResponse { ok: true }).into_response(),
        Err(e) => error_response(&e),
    }
}
