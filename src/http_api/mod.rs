use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AccessorError, NewResource, NewTask, ProjectAccessor, ProjectHost, RecordId, ResourceQuery,
    ResourceView, TaskView,
};

pub struct AppState<H: ProjectHost> {
    accessor: Arc<RwLock<ProjectAccessor<H>>>,
}

impl<H: ProjectHost> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            accessor: self.accessor.clone(),
        }
    }
}

impl<H: ProjectHost> AppState<H> {
    pub fn new(accessor: ProjectAccessor<H>) -> Self {
        Self {
            accessor: Arc::new(RwLock::new(accessor)),
        }
    }

    pub fn with_shared(accessor: Arc<RwLock<ProjectAccessor<H>>>) -> Self {
        Self { accessor }
    }

    fn accessor(&self) -> Arc<RwLock<ProjectAccessor<H>>> {
        self.accessor.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Unavailable(String),
}

impl From<AccessorError> for ApiError {
    fn from(value: AccessorError) -> Self {
        match value {
            AccessorError::NotFound { .. } => ApiError::NotFound(value.to_string()),
            AccessorError::HostUnavailable(_) => ApiError::Unavailable(value.to_string()),
            other => ApiError::Invalid(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Unavailable(message) => {
                (StatusCode::SERVICE_UNAVAILABLE, "host_unavailable", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct AssignPayload {
    resources: Vec<RecordId>,
}

#[derive(Debug, Deserialize)]
struct AvailabilityParams {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Debug, Serialize)]
struct AvailabilityBody {
    resource: RecordId,
    start: NaiveDate,
    end: NaiveDate,
    available: bool,
}

pub fn router<H>(state: AppState<H>) -> Router
where
    H: ProjectHost + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks::<H>).post(create_task::<H>))
        .route("/tasks/:id", get(get_task::<H>).delete(delete_task::<H>))
        .route("/tasks/:id/assignments", post(assign_resources::<H>))
        .route(
            "/resources",
            get(list_resources::<H>).post(create_resource::<H>),
        )
        .route("/resources/query", get(query_resources::<H>))
        .route(
            "/resources/:id",
            get(get_resource::<H>).delete(delete_resource::<H>),
        )
        .route("/resources/:id/availability", get(availability::<H>))
        .route("/save", post(save::<H>))
        .with_state(state)
}

/// Serves until Ctrl-C, then saves and closes the session.
pub async fn serve<H>(addr: SocketAddr, accessor: ProjectAccessor<H>) -> std::io::Result<()>
where
    H: ProjectHost + Send + Sync + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "http api listening");
    serve_with_shutdown(listener, accessor, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown requested");
    })
    .await
}

/// Serves on `listener` until `shutdown` resolves, then saves and closes the
/// session.
pub async fn serve_with_shutdown<H, F>(
    listener: tokio::net::TcpListener,
    accessor: ProjectAccessor<H>,
    shutdown: F,
) -> std::io::Result<()>
where
    H: ProjectHost + Send + Sync + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::new(accessor);
    let app = router(state.clone());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    let accessor = state.accessor();
    let mut guard = accessor.write();
    guard.close().map_err(|err| std::io::Error::other(err.to_string()))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_tasks<H: ProjectHost>(
    State(state): State<AppState<H>>,
) -> Result<Json<Vec<TaskView>>, ApiError> {
    let accessor = state.accessor();
    let tasks = {
        let guard = accessor.read();
        guard.list_tasks()?
    };
    Ok(Json(tasks))
}

async fn get_task<H: ProjectHost>(
    State(state): State<AppState<H>>,
    Path(task_id): Path<RecordId>,
) -> Result<Json<TaskView>, ApiError> {
    let accessor = state.accessor();
    let task = {
        let guard = accessor.read();
        guard.get_task(task_id)?
    };
    Ok(Json(task))
}

async fn create_task<H: ProjectHost>(
    State(state): State<AppState<H>>,
    Json(task): Json<NewTask>,
) -> Result<(StatusCode, Json<TaskView>), ApiError> {
    let accessor = state.accessor();
    let created = {
        let mut guard = accessor.write();
        let id = guard.append_task(task)?;
        guard.get_task(id)?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_task<H: ProjectHost>(
    State(state): State<AppState<H>>,
    Path(task_id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    let accessor = state.accessor();
    {
        let mut guard = accessor.write();
        guard.delete_task(task_id)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn assign_resources<H: ProjectHost>(
    State(state): State<AppState<H>>,
    Path(task_id): Path<RecordId>,
    Json(payload): Json<AssignPayload>,
) -> Result<Json<TaskView>, ApiError> {
    let accessor = state.accessor();
    let updated = {
        let mut guard = accessor.write();
        guard.assign_resources(task_id, &payload.resources)?;
        guard.get_task(task_id)?
    };
    Ok(Json(updated))
}

async fn list_resources<H: ProjectHost>(
    State(state): State<AppState<H>>,
) -> Result<Json<Vec<ResourceView>>, ApiError> {
    let accessor = state.accessor();
    let resources = {
        let guard = accessor.read();
        guard.list_resources()?
    };
    Ok(Json(resources))
}

async fn get_resource<H: ProjectHost>(
    State(state): State<AppState<H>>,
    Path(resource_id): Path<RecordId>,
) -> Result<Json<ResourceView>, ApiError> {
    let accessor = state.accessor();
    let resource = {
        let guard = accessor.read();
        guard.get_resource(resource_id)?
    };
    Ok(Json(resource))
}

async fn create_resource<H: ProjectHost>(
    State(state): State<AppState<H>>,
    Json(resource): Json<NewResource>,
) -> Result<(StatusCode, Json<ResourceView>), ApiError> {
    let accessor = state.accessor();
    let created = {
        let mut guard = accessor.write();
        let id = guard.append_resource(resource)?;
        guard.get_resource(id)?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_resource<H: ProjectHost>(
    State(state): State<AppState<H>>,
    Path(resource_id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    let accessor = state.accessor();
    {
        let mut guard = accessor.write();
        guard.delete_resource(resource_id)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn availability<H: ProjectHost>(
    State(state): State<AppState<H>>,
    Path(resource_id): Path<RecordId>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<AvailabilityBody>, ApiError> {
    let accessor = state.accessor();
    let available = {
        let guard = accessor.read();
        guard.check_availability(resource_id, params.start, params.end)?
    };
    Ok(Json(AvailabilityBody {
        resource: resource_id,
        start: params.start,
        end: params.end,
        available,
    }))
}

async fn query_resources<H: ProjectHost>(
    State(state): State<AppState<H>>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<Vec<ResourceView>>, ApiError> {
    let accessor = state.accessor();
    let resources = {
        let guard = accessor.read();
        guard.query(&query)?
    };
    Ok(Json(resources))
}

async fn save<H: ProjectHost>(State(state): State<AppState<H>>) -> Result<StatusCode, ApiError> {
    let accessor = state.accessor();
    {
        let mut guard = accessor.write();
        guard.save()?;
    }
    Ok(StatusCode::NO_CONTENT)
}
