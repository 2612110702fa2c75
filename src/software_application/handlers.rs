use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::models::{
    AddSoftwareApplicationRequest, SoftwareApplicationModel, SoftwareApplicationResponse,
    SoftwareApplicationsResponse,
};
use crate::auth::require_auth;
use crate::shared::{AppError, AppState, MessageResponse};
use crate::store::find_or_not_found;

/// Routes mounted under /api/v1/softwareapplication
pub fn router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/add", post(add_application))
        .route("/delete/:id", delete(delete_application))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/getall", get(get_all_applications))
        .merge(protected)
}

/// POST /add
#[instrument(name = "add_software_application", skip(state))]
pub async fn add_application(
    State(state): State<AppState>,
    Json(request): Json<AddSoftwareApplicationRequest>,
) -> Result<(StatusCode, Json<SoftwareApplicationResponse>), AppError> {
    let application = SoftwareApplicationModel::from_request(request)?;
    state.software_applications.insert(&application).await?;

    info!(application_id = %application.id, "Software application added");

    Ok((
        StatusCode::CREATED,
        Json(SoftwareApplicationResponse {
            success: true,
            message: "New Software Application Added!".to_string(),
            software_application: application,
        }),
    ))
}

/// DELETE /delete/:id
#[instrument(name = "delete_software_application", skip(state))]
pub async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let application = find_or_not_found(
        state.software_applications.as_ref(),
        &id,
        "Software application",
    )
    .await?;
    state.software_applications.delete(&application.id).await?;

    info!(application_id = %id, "Software application deleted");
    Ok(Json(MessageResponse::new("Software Application Deleted!")))
}

/// GET /getall
#[instrument(name = "get_all_software_applications", skip(state))]
pub async fn get_all_applications(
    State(state): State<AppState>,
) -> Result<Json<SoftwareApplicationsResponse>, AppError> {
    let software_applications = state.software_applications.list().await?;
    Ok(Json(SoftwareApplicationsResponse {
        success: true,
        software_applications,
    }))
}
