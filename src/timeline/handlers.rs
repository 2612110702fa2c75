use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    models::TimelineModel,
    types::{AddTimelineRequest, TimelineResponse, TimelinesResponse},
};
use crate::auth::require_auth;
use crate::shared::{AppError, AppState, MessageResponse};
use crate::store::find_or_not_found;

/// Routes mounted under /api/v1/timeline
pub fn router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/add", post(add_timeline))
        .route("/delete/:id", delete(delete_timeline))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/getall", get(get_all_timelines))
        .merge(protected)
}

/// POST /add
#[instrument(name = "add_timeline", skip(state))]
pub async fn add_timeline(
    State(state): State<AppState>,
    Json(request): Json<AddTimelineRequest>,
) -> Result<(StatusCode, Json<TimelineResponse>), AppError> {
    let timeline = TimelineModel::from_request(request)?;
    state.timelines.insert(&timeline).await?;

    info!(timeline_id = %timeline.id, "Timeline added");

    Ok((
        StatusCode::CREATED,
        Json(TimelineResponse {
            success: true,
            message: "Timeline Added!".to_string(),
            timeline,
        }),
    ))
}

/// DELETE /delete/:id
#[instrument(name = "delete_timeline", skip(state))]
pub async fn delete_timeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let timeline = find_or_not_found(state.timelines.as_ref(), &id, "Timeline").await?;
    state.timelines.delete(&timeline.id).await?;

    info!(timeline_id = %id, "Timeline deleted");
    Ok(Json(MessageResponse::new("Timeline Deleted!")))
}

/// GET /getall
#[instrument(name = "get_all_timelines", skip(state))]
pub async fn get_all_timelines(
    State(state): State<AppState>,
) -> Result<Json<TimelinesResponse>, AppError> {
    let timelines = state.timelines.list().await?;

    info!(timeline_count = timelines.len(), "Timelines listed");
    Ok(Json(TimelinesResponse {
        success: true,
        timelines,
    }))
}
