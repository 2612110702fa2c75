use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    models::ProjectModel,
    types::{AddProjectRequest, ProjectResponse, ProjectsResponse, UpdateProjectRequest},
};
use crate::auth::require_auth;
use crate::shared::{AppError, AppState, MessageResponse};
use crate::store::find_or_not_found;

/// Routes mounted under /api/v1/project
pub fn router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/add", post(add_project))
        .route("/delete/:id", delete(delete_project))
        .route("/update/:id", put(update_project))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/getall", get(get_all_projects))
        .route("/get/:id", get(get_project))
        .merge(protected)
}

/// POST /add
#[instrument(name = "add_project", skip(state, request))]
pub async fn add_project(
    State(state): State<AppState>,
    Json(request): Json<AddProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    let project = ProjectModel::from_request(request)?;
    state.projects.insert(&project).await?;

    info!(project_id = %project.id, title = %project.title, "Project added");

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse {
            success: true,
            message: Some("New Project Added!".to_string()),
            project,
        }),
    ))
}

/// DELETE /delete/:id
#[instrument(name = "delete_project", skip(state))]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let project = find_or_not_found(state.projects.as_ref(), &id, "Project").await?;
    state.projects.delete(&project.id).await?;

    info!(project_id = %id, "Project deleted");
    Ok(Json(MessageResponse::new("Project Deleted!")))
}

/// PUT /update/:id
#[instrument(name = "update_project", skip(state, request))]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    let mut project = find_or_not_found(state.projects.as_ref(), &id, "Project").await?;
    project.apply(request)?;
    state.projects.replace(&project).await?;

    info!(project_id = %id, "Project updated");
    Ok(Json(ProjectResponse {
        success: true,
        message: Some("Project Updated!".to_string()),
        project,
    }))
}

/// GET /getall
#[instrument(name = "get_all_projects", skip(state))]
pub async fn get_all_projects(
    State(state): State<AppState>,
) -> Result<Json<ProjectsResponse>, AppError> {
    let projects = state.projects.list().await?;

    info!(project_count = projects.len(), "Projects listed");
    Ok(Json(ProjectsResponse {
        success: true,
        projects,
    }))
}

/// GET /get/:id
#[instrument(name = "get_project", skip(state))]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectResponse>, AppError> {
    let project = find_or_not_found(state.projects.as_ref(), &id, "Project").await?;
    Ok(Json(ProjectResponse {
        success: true,
        message: None,
        project,
    }))
}
