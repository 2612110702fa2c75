use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Extension, Json, Router,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::UserService,
    types::{
        LoginRequest, PublicUser, RegisterRequest, UpdatePasswordRequest, UpdateProfileRequest,
        UserResponse,
    },
};
use crate::auth::{require_auth, send_token, AuthUser, SessionCookie};
use crate::shared::{AppError, AppState, MessageResponse};

/// Routes mounted under /api/v1/user
pub fn router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", get(logout))
        .route("/me", get(get_user))
        .route("/me/profile/update", put(update_profile))
        .route("/password/update", put(update_password))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me/portfolio", get(get_portfolio_user))
        .merge(protected)
}

/// POST /register
/// Creates the account and logs it in
#[instrument(name = "register", skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let service = UserService::new(Arc::clone(&state.users));
    let user = service.register(request).await?;

    send_token(&state, &user, "User Registered!", StatusCode::CREATED)
}

/// POST /login
#[instrument(name = "login", skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let service = UserService::new(Arc::clone(&state.users));
    let user = service.login(request).await?;

    send_token(&state, &user, "Logged In!", StatusCode::OK)
}

/// GET /logout
/// Overwrites the token cookie with an expired one
#[instrument(name = "logout", skip_all, fields(user_id = %user.id))]
pub async fn logout(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> Result<Response, AppError> {
    let cookie = SessionCookie::cleared(&state.config).to_header_value()?;
    info!("User logged out");

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(MessageResponse::new("Logged Out!")),
    )
        .into_response())
}

/// GET /me
#[instrument(name = "get_user", skip_all, fields(user_id = %user.id))]
pub async fn get_user(Extension(AuthUser(user)): Extension<AuthUser>) -> Json<UserResponse> {
    Json(UserResponse {
        success: true,
        message: None,
        user: PublicUser::from(&user),
    })
}

/// PUT /me/profile/update
#[instrument(name = "update_profile", skip_all, fields(user_id = %user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let service = UserService::new(Arc::clone(&state.users));
    let user = service.update_profile(user, request).await?;

    Ok(Json(UserResponse {
        success: true,
        message: Some("Profile Updated!".to_string()),
        user: PublicUser::from(&user),
    }))
}

/// PUT /password/update
#[instrument(name = "update_password", skip_all, fields(user_id = %user.id))]
pub async fn update_password(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let service = UserService::new(Arc::clone(&state.users));
    service.update_password(user, request).await?;

    Ok(Json(MessageResponse::new("Password Updated!")))
}

/// GET /me/portfolio
/// Public profile of the portfolio owner
#[instrument(name = "get_portfolio_user", skip(state))]
pub async fn get_portfolio_user(
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AppError> {
    let service = UserService::new(Arc::clone(&state.users));
    let user = service.portfolio_owner().await?;

    Ok(Json(UserResponse {
        success: true,
        message: None,
        user: PublicUser::from(&user),
    }))
}
