use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::debug;

use crate::config::Config;

/// Exact origin match against the allow-list, ignoring a trailing slash
pub fn is_allowed_origin(origin: &str, allow_list: &[String]) -> bool {
    let origin = origin.trim_end_matches('/');
    allow_list
        .iter()
        .any(|allowed| allowed.trim_end_matches('/') == origin)
}

/// CORS layer for the front-end origins. Requests from other origins get no
/// `Access-Control-Allow-Origin`; OPTIONS preflights are answered here.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let allow_list = config.allowed_origins();
    debug!(origins = ?allow_list, "Configuring CORS allow-list");

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request| {
                origin
                    .to_str()
                    .map(|origin| is_allowed_origin(origin, &allow_list))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}
