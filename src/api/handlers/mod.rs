use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::AppState;
use crate::models::*;
use crate::notify::ChangeSubscription;
use crate::qr;

type ApiResult<T> = Result<T, ApiError>;

/// Plain acknowledgement returned by mutations without a richer result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateResponse {
    pub message: String,
    #[serde(flatten)]
    pub auth: Authenticated,
}

/// `?id=` selector for deletes.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<RowId>,
}

impl IdQuery {
    fn require(query: Result<Query<IdQuery>, QueryRejection>) -> ApiResult<RowId> {
        let Query(query) = query?;
        query.id.ok_or_else(|| ApiError::bad_request("Missing id"))
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Authentication
// ============================================================

pub async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<AuthenticateInput>, JsonRejection>,
) -> ApiResult<Json<AuthenticateResponse>> {
    let Json(input) = payload?;
    let auth = state.roster.authenticate(&input)?;
    let message = if auth.is_admin {
        "Authentication successful (Admin mode)"
    } else {
        "Authentication successful"
    };
    Ok(Json(AuthenticateResponse {
        message: message.to_string(),
        auth,
    }))
}

// ============================================================
// Cleaners
// ============================================================

pub async fn list_cleaners(State(state): State<AppState>) -> ApiResult<Json<Vec<Cleaner>>> {
    Ok(Json(state.roster.list_cleaners()?))
}

pub async fn add_cleaner(
    State(state): State<AppState>,
    payload: Result<Json<CreateCleanerInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Cleaner>)> {
    let Json(input) = payload?;
    let cleaner = state.roster.add_cleaner(&input)?;
    Ok((StatusCode::CREATED, Json(cleaner)))
}

pub async fn remove_cleaner(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let id = IdQuery::require(query)?;
    state.roster.remove_cleaner(id)?;
    Ok(MessageResponse::new("Cleaner deleted successfully"))
}

// ============================================================
// Tasks
// ============================================================

pub async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<TaskWithCleaner>>> {
    let Query(query) = query?;
    Ok(Json(state.roster.list_tasks(&query)?))
}

pub async fn add_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(input) = payload?;
    let task = state.roster.add_task(&input)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn remove_task(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let id = IdQuery::require(query)?;
    state.roster.remove_task(id)?;
    Ok(MessageResponse::new("Task deleted successfully"))
}

pub async fn set_task_completed(
    State(state): State<AppState>,
    payload: Result<Json<SetTaskCompletedInput>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(input) = payload?;
    state.roster.set_task_completed(&input)?;
    Ok(MessageResponse::new("Task updated successfully"))
}

// ============================================================
// Sharing
// ============================================================

pub async fn qr_code(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let png = qr::render_png(&state.public_url).map_err(ApiError::internal)?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        png,
    ))
}

pub async fn reachable_url(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "ip": &*state.public_url }))
}

// ============================================================
// Live updates
// ============================================================

/// Upgrade to a WebSocket that receives `{"event":"update"}` after every
/// change. Clients should fetch current state once connected.
pub async fn events(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let updates = state.roster.notifier().subscribe();
    ws.on_upgrade(move |socket| forward_updates(socket, updates))
}

async fn forward_updates(socket: WebSocket, mut updates: ChangeSubscription) {
    let (mut sender, mut receiver) = socket.split();

    let send_task = tokio::spawn(async move {
        while let Some(event) = updates.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(v) => v,
                Err(_) => continue,
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Client frames are ignored; the loop only detects disconnects
    while let Some(Ok(_msg)) = receiver.next().await {}

    send_task.abort();
    tracing::debug!("Live update client disconnected");
}
