//! HTTP JSON shell over the task commands.
//!
//! Routes:
//!
//! ```text
//! GET  /health
//! GET  /tasks?q=&status=&edit=    filtered view
//! POST /tasks                     {title, description?, due_date?}
//! POST /tasks/:id/status          {state: "completed" | "active"}
//! POST /tasks/:id/update          {title, description?, due_date?, completed?}
//! POST /tasks/:id/delete
//! ```
//!
//! The store is synchronous; every command runs on the blocking pool.
//! Malformed bodies are rejected as validation errors, after the id lookup
//! on routes that carry one.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::error::{Error, JsonError};
use crate::query::{StatusFilter, TaskView, ViewQuery};
use crate::service::{NewTask, TaskService, TaskUpdate};
use crate::task::Task;

/// Query string for `GET /tasks`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub edit: Option<String>,
}

impl ListParams {
    fn into_query(self) -> ViewQuery {
        let status = self
            .status
            .as_deref()
            .map(StatusFilter::parse_lenient)
            .unwrap_or_default();
        ViewQuery::new(self.q, status, self.edit)
    }
}

#[derive(Debug, Default, Deserialize)]
struct StatusBody {
    #[serde(default)]
    state: String,
}

/// A command failure rendered as `{status: "error", error: {message, code, kind}}`
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::TaskNotFound(_) => StatusCode::NOT_FOUND,
            err if err.is_validation() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = json!({
            "status": "error",
            "error": JsonError::from(&self.0),
        });
        (status, Json(body)).into_response()
    }
}

pub fn router(service: TaskService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:id/status", post(update_status))
        .route("/tasks/:id/update", post(update_task))
        .route("/tasks/:id/delete", post(delete_task))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(service: TaskService, addr: &str) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| Error::OperationFailed(format!("cannot bind {addr}: {err}")))?;
    tracing::info!(addr, "listening");
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| Error::OperationFailed(format!("server stopped: {err}")))?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

async fn run_blocking<T, F>(service: TaskService, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&TaskService) -> crate::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|err| Error::OperationFailed(format!("task worker failed: {err}")))?
        .map_err(ApiError::from)
}

/// Body extraction that reports failures through `ApiError`
type JsonBody<T> = Result<Json<T>, JsonRejection>;

fn request_body<T>(body: JsonBody<T>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError(rejected_body(rejection)))
}

fn rejected_body(rejection: JsonRejection) -> Error {
    Error::InvalidArgument(format!("invalid request body: {}", rejection.body_text()))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_tasks(
    State(service): State<TaskService>,
    Query(params): Query<ListParams>,
) -> Result<Json<TaskView>, ApiError> {
    let query = params.into_query();
    let view = run_blocking(service, move |service| Ok(service.view(&query))).await?;
    Ok(Json(view))
}

async fn create_task(
    State(service): State<TaskService>,
    body: JsonBody<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let input = request_body(body)?;
    let task = run_blocking(service, move |service| service.create(input)).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_status(
    State(service): State<TaskService>,
    Path(id): Path<String>,
    body: JsonBody<StatusBody>,
) -> Result<Json<Task>, ApiError> {
    let task = run_blocking(service, move |service| match body {
        Ok(Json(body)) => service.set_status(&id, &body.state),
        Err(rejection) => {
            service.get(&id)?;
            Err(rejected_body(rejection))
        }
    })
    .await?;
    Ok(Json(task))
}

async fn update_task(
    State(service): State<TaskService>,
    Path(id): Path<String>,
    body: JsonBody<TaskUpdate>,
) -> Result<Json<Task>, ApiError> {
    let task = run_blocking(service, move |service| match body {
        Ok(Json(input)) => service.update(&id, input),
        Err(rejection) => {
            service.get(&id)?;
            Err(rejected_body(rejection))
        }
    })
    .await?;
    Ok(Json(task))
}

async fn delete_task(
    State(service): State<TaskService>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task = run_blocking(service, move |service| service.delete(&id)).await?;
    Ok(Json(task))
}
