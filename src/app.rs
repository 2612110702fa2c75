use axum::{
    extract::Request,
    http::header::ORIGIN,
    middleware,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::info_span;

use crate::auth::cors_layer;
use crate::shared::{handle_panic, normalize_errors, route_not_found, AppState};
use crate::{message, project, skill, software_application, timeline, user};

/// Builds the full API router: resource routers under /api/v1, the 404
/// fallback, error normalization, request tracing and CORS.
pub fn build_router(state: AppState) -> Router {
    with_middleware(api_routes(&state), state)
}

/// Resource routers mounted under /api/v1
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/api/v1/user", user::router(state))
        .nest("/api/v1/timeline", timeline::router(state))
        .nest("/api/v1/message", message::router(state))
        .nest("/api/v1/skill", skill::router(state))
        .nest(
            "/api/v1/softwareapplication",
            software_application::router(state),
        )
        .nest("/api/v1/project", project::router(state))
}

/// Wraps `routes` in the 404 fallback, panic catcher, error normalizer,
/// request tracing and CORS. Layers are listed innermost first.
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    routes
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(state.clone(), normalize_errors))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    origin = ?request.headers().get(ORIGIN),
                )
            }),
        )
        .layer(cors)
        .with_state(state)
}
