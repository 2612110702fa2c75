use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{info, instrument, warn};

use super::{cookies::get_cookie_value, cookies::TOKEN_COOKIE, types::AuthUser};
use crate::shared::{AppError, AppState};

/// Authentication middleware - reads the `token` cookie (or an Authorization
/// Bearer header), verifies it and adds the user to the request.
/// Usage: .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth))
/// Handlers can then extract Extension(user): Extension<AuthUser>.
#[instrument(skip(state, req, next), fields(uri = %req.uri()))]
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = get_cookie_value(req.headers(), TOKEN_COOKIE)
        .filter(|token| !token.is_empty())
        .or_else(|| {
            req.headers()
                .get("Authorization")
                .and_then(|header| header.to_str().ok())
                .and_then(|header| header.strip_prefix("Bearer "))
                .map(|token| token.trim().to_string())
        })
        .ok_or_else(|| {
            warn!("Request carries no session token");
            AppError::Unauthorized("User not authenticated".to_string())
        })?;

    let claims = state.tokens.verify(&token)?;

    let user = state.users.get(&claims.id).await?.ok_or_else(|| {
        warn!(user_id = %claims.id, "Token refers to a user that no longer exists");
        AppError::Unauthorized("User not authenticated".to_string())
    })?;

    info!(user_id = %user.id, "Authentication successful, adding user to request");
    req.extensions_mut().insert(AuthUser(user));

    Ok(next.run(req).await)
}
