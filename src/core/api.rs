//! HTTP + WebSocket host for Shockwatch
//!
//! Endpoints:
//! - POST /evaluate - Stateless evaluation of {snapshot, prior?}
//! - POST /env/{id}/cycle - Evaluate the next cycle of an environment
//! - GET /env/{id}/state - Stored state and last alert
//! - DELETE /env/{id} - Forget an environment
//! - WS /ws/{id} - Live alert stream
//! - GET /health - Health check

use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};

use crate::core::evaluate::ShockDetector;
use crate::core::input::{parse_prior, parse_snapshot};
use crate::core::store::{is_valid_env_id, load_state, save_state, StateFile};
use crate::error::ShockError;
use crate::types::{AlertRecord, Evaluation, NextCycleState, PriorCycleState, SignalSnapshot};

/// Environment state held by the host
#[derive(Debug)]
pub struct EnvState {
    /// `None` until the first cycle (a live subscriber may arrive earlier)
    pub next: Option<NextCycleState>,
    pub last_alert: Option<AlertRecord>,
    pub update_tx: broadcast::Sender<AlertRecord>,
}

impl EnvState {
    fn new() -> Self {
        let (update_tx, _) = broadcast::channel(100);
        Self {
            next: None,
            last_alert: None,
            update_tx,
        }
    }
}

/// Shared handle to one environment; cycles of one environment run one at a time
pub type EnvHandle = Arc<Mutex<EnvState>>;

/// App state
///
/// The map lock is only held to look up, insert or remove handles. File IO
/// happens under the environment's own lock.
pub struct AppState {
    pub environments: RwLock<HashMap<String, EnvHandle>>,
    /// Mirror environment state to `<dir>/<id>.json` when set
    pub state_dir: Option<PathBuf>,
    pub detector: ShockDetector,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environments: usize,
}

/// Stored state response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvStateResponse {
    pub next: NextCycleState,
    pub last_alert: Option<AlertRecord>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

/// Error response: status + `{error, field?}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn not_found(env: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody {
                error: format!("unknown environment: {}", env),
                field: None,
            },
        }
    }

    fn invalid_env(env: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: format!("invalid environment id: {:?}", env),
                field: Some("id".to_string()),
            },
        }
    }
}

impl From<ShockError> for ApiError {
    fn from(err: ShockError) -> Self {
        let status = if err.is_caller_error() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::warn!(error = %err, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            body: ErrorBody {
                error: err.to_string(),
                field: err.field().map(str::to_string),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Create the API router
pub fn create_router(state_dir: Option<PathBuf>) -> Router {
    let state = Arc::new(AppState {
        environments: RwLock::new(HashMap::new()),
        state_dir,
        detector: ShockDetector::new(),
    });

    Router::new()
        .route("/health", get(health))
        .route("/evaluate", post(evaluate_stateless))
        .route("/env/:id/cycle", post(evaluate_cycle))
        .route("/env/:id/state", get(get_state))
        .route("/env/:id", delete(forget_env))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let handles: Vec<EnvHandle> = state.environments.read().await.values().cloned().collect();
    let mut stored = 0;
    for handle in handles {
        if handle.lock().await.next.is_some() {
            stored += 1;
        }
    }
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        environments: stored,
    })
}

/// Stateless evaluation; the caller carries `next` forward
async fn evaluate_stateless(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Evaluation>, ApiError> {
    let Value::Object(body) = body else {
        return Err(ShockError::malformed("body", "expected an object with `snapshot`").into());
    };
    let snapshot = body
        .get("snapshot")
        .ok_or_else(|| ShockError::malformed("snapshot", "missing"))?;

    let snapshot = parse_snapshot(snapshot)?;
    let prior = body.get("prior").map(parse_prior).transpose()?;

    Ok(Json(state.detector.evaluate(&snapshot, prior.as_ref())))
}

/// Run state-file IO on the blocking pool
async fn blocking<T, F>(task: F) -> Result<T, ShockError>
where
    F: FnOnce() -> Result<T, ShockError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ShockError::io("state file task", e.into()))?
}

async fn read_state_file(state: &AppState, id: &str) -> Result<Option<StateFile>, ShockError> {
    let Some(dir) = state.state_dir.clone() else {
        return Ok(None);
    };
    let id = id.to_string();
    blocking(move || load_state(&dir, &id)).await
}

/// Handle for `id`, inserted if absent
async fn env_handle(state: &AppState, id: &str) -> EnvHandle {
    let mut environments = state.environments.write().await;
    environments
        .entry(id.to_string())
        .or_insert_with(|| Arc::new(Mutex::new(EnvState::new())))
        .clone()
}

/// Drop the entry for `id` if it holds no state, has no live subscribers and
/// no request is using it. Returns whether it was dropped.
async fn prune_idle(state: &AppState, id: &str) -> bool {
    let mut environments = state.environments.write().await;
    // Handles are only cloned under the map lock, so a count of one means unused
    let idle = environments.get(id).is_some_and(|handle| {
        Arc::strong_count(handle) == 1
            && handle
                .try_lock()
                .is_ok_and(|env| env.next.is_none() && env.update_tx.receiver_count() == 0)
    });
    if idle {
        environments.remove(id);
        tracing::debug!(env = %id, "idle environment dropped");
    }
    idle
}

/// Evaluate the next cycle of a stored environment
async fn evaluate_cycle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Evaluation>, ApiError> {
    if !is_valid_env_id(&id) {
        return Err(ApiError::invalid_env(&id));
    }
    let snapshot = parse_snapshot(&body)?;

    let handle = env_handle(&state, &id).await;
    let result = run_cycle(&state, &id, &handle, &snapshot).await;
    drop(handle);

    if result.is_err() {
        prune_idle(&state, &id).await;
    }
    Ok(Json(result?))
}

async fn run_cycle(
    state: &AppState,
    id: &str,
    handle: &Mutex<EnvState>,
    snapshot: &SignalSnapshot,
) -> Result<Evaluation, ShockError> {
    let mut env = handle.lock().await;
    if env.next.is_none() {
        if let Some(file) = read_state_file(state, id).await? {
            env.next = Some(file.next);
            env.last_alert = file.last_alert;
        }
    }

    let prior = env.next.as_ref().map(PriorCycleState::from);
    let eval = state.detector.evaluate(snapshot, prior.as_ref());

    if let Some(dir) = state.state_dir.clone() {
        let (env_id, saved) = (id.to_string(), eval.clone());
        blocking(move || save_state(&dir, &env_id, &saved)).await?;
    }

    env.next = Some(eval.next.clone());
    env.last_alert = Some(eval.alert.clone());
    // No subscribers is fine
    let _ = env.update_tx.send(eval.alert.clone());

    tracing::debug!(env = %id, cycle = eval.alert.cycle_number, flag = %eval.alert.flag, "cycle stored");
    Ok(eval)
}

/// Get stored state for an environment
async fn get_state(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EnvStateResponse>, ApiError> {
    if !is_valid_env_id(&id) {
        return Err(ApiError::invalid_env(&id));
    }

    let handle = state.environments.read().await.get(&id).cloned();
    if let Some(handle) = handle {
        let env = handle.lock().await;
        if let Some(next) = &env.next {
            return Ok(Json(EnvStateResponse {
                next: next.clone(),
                last_alert: env.last_alert.clone(),
            }));
        }
    }

    if let Some(StateFile { next, last_alert }) = read_state_file(&state, &id).await? {
        return Ok(Json(EnvStateResponse { next, last_alert }));
    }
    Err(ApiError::not_found(&id))
}

/// Forget an environment
async fn forget_env(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !is_valid_env_id(&id) {
        return Err(ApiError::invalid_env(&id));
    }

    let removed = state.environments.write().await.remove(&id);
    // Waits out a cycle in flight before the file goes
    let mut known = match removed {
        Some(handle) => handle.lock().await.next.is_some(),
        None => false,
    };

    if let Some(dir) = state.state_dir.clone() {
        let path = dir.join(format!("{}.json", id));
        known |= blocking(move || match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ShockError::io(format!("remove {}", path.display()), e)),
        })
        .await?;
    }

    if known {
        tracing::info!(env = %id, "environment forgotten");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(&id))
    }
}

/// WebSocket handler for live alerts
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    if !is_valid_env_id(&id) {
        return Err(ApiError::invalid_env(&id));
    }

    // Subscribing before the first cycle is allowed; the entry goes again on disconnect
    let handle = env_handle(&state, &id).await;
    let rx = handle.lock().await.update_tx.subscribe();
    drop(handle);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, rx).await;
        prune_idle(&state, &id).await;
    }))
}

/// Handle WebSocket connection
async fn handle_websocket(mut socket: WebSocket, mut rx: broadcast::Receiver<AlertRecord>) {
    loop {
        let alert = match rx.recv().await {
            Ok(alert) => alert,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "live subscriber lagging");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };
        let json = match serde_json::to_string(&alert) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "alert not serializable");
                continue;
            }
        };
        if socket.send(Message::Text(json)).await.is_err() {
            break;
        }
    }
}

/// Run the API server
pub async fn run_server(addr: &str, state_dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state_dir);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "shockwatch API running");
    tracing::info!("  POST   /evaluate        - Stateless evaluation");
    tracing::info!("  POST   /env/:id/cycle   - Next cycle of an environment");
    tracing::info!("  GET    /env/:id/state   - Stored state");
    tracing::info!("  DELETE /env/:id         - Forget environment");
    tracing::info!("  WS     /ws/:id          - Live alerts");
    tracing::info!("  GET    /health          - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
