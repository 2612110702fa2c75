use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    models::{validate_proficiency, SkillModel},
    types::{AddSkillRequest, SkillResponse, SkillsResponse, UpdateSkillRequest},
};
use crate::auth::require_auth;
use crate::shared::{AppError, AppState, MessageResponse};
use crate::store::find_or_not_found;

/// Routes mounted under /api/v1/skill
pub fn router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/add", post(add_skill))
        .route("/delete/:id", delete(delete_skill))
        .route("/update/:id", put(update_skill))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/getall", get(get_all_skills))
        .merge(protected)
}

/// POST /add
#[instrument(name = "add_skill", skip(state))]
pub async fn add_skill(
    State(state): State<AppState>,
    Json(request): Json<AddSkillRequest>,
) -> Result<(StatusCode, Json<SkillResponse>), AppError> {
    let skill = SkillModel::from_request(request)?;
    state.skills.insert(&skill).await?;

    info!(skill_id = %skill.id, "Skill added");

    Ok((
        StatusCode::CREATED,
        Json(SkillResponse {
            success: true,
            message: "New Skill Added!".to_string(),
            skill,
        }),
    ))
}

/// DELETE /delete/:id
#[instrument(name = "delete_skill", skip(state))]
pub async fn delete_skill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let skill = find_or_not_found(state.skills.as_ref(), &id, "Skill").await?;
    state.skills.delete(&skill.id).await?;

    info!(skill_id = %id, "Skill deleted");
    Ok(Json(MessageResponse::new("Skill Deleted!")))
}

/// PUT /update/:id
/// Only the proficiency can change
#[instrument(name = "update_skill", skip(state))]
pub async fn update_skill(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSkillRequest>,
) -> Result<Json<SkillResponse>, AppError> {
    let mut skill = find_or_not_found(state.skills.as_ref(), &id, "Skill").await?;
    let proficiency = request
        .proficiency
        .ok_or_else(|| AppError::BadRequest("Proficiency is required".to_string()))?;

    skill.proficiency = validate_proficiency(proficiency)?;
    state.skills.replace(&skill).await?;

    info!(skill_id = %id, proficiency = skill.proficiency, "Skill updated");
    Ok(Json(SkillResponse {
        success: true,
        message: "Skill Updated!".to_string(),
        skill,
    }))
}

/// GET /getall
#[instrument(name = "get_all_skills", skip(state))]
pub async fn get_all_skills(
    State(state): State<AppState>,
) -> Result<Json<SkillsResponse>, AppError> {
    let skills = state.skills.list().await?;
    Ok(Json(SkillsResponse {
        success: true,
        skills,
    }))
}
