use axum::{
    body::to_bytes,
    extract::{OriginalUri, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::any::Any;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::message::models::MessageModel;
use crate::project::models::ProjectModel;
use crate::skill::models::SkillModel;
use crate::software_application::models::SoftwareApplicationModel;
use crate::store::{
    Document, DocumentRepository, InMemoryDocumentRepository, PostgresDocumentRepository,
};
use crate::timeline::models::TimelineModel;
use crate::user::models::UserModel;

const MAX_ERROR_BODY: usize = 64 * 1024;

pub type Repository<T> = Arc<dyn DocumentRepository<T>>;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: TokenIssuer,
    pub users: Repository<UserModel>,
    pub timelines: Repository<TimelineModel>,
    pub messages: Repository<MessageModel>,
    pub skills: Repository<SkillModel>,
    pub software_applications: Repository<SoftwareApplicationModel>,
    pub projects: Repository<ProjectModel>,
}

impl AppState {
    /// State backed by in-memory collections
    pub fn in_memory(config: Config) -> Self {
        Self {
            tokens: TokenIssuer::new(&config.jwt_secret, config.jwt_ttl),
            config: Arc::new(config),
            users: Arc::new(InMemoryDocumentRepository::new()),
            timelines: Arc::new(InMemoryDocumentRepository::new()),
            messages: Arc::new(InMemoryDocumentRepository::new()),
            skills: Arc::new(InMemoryDocumentRepository::new()),
            software_applications: Arc::new(InMemoryDocumentRepository::new()),
            projects: Arc::new(InMemoryDocumentRepository::new()),
        }
    }

    /// State backed by PostgreSQL, creating collection tables as needed
    pub async fn postgres(config: Config, pool: PgPool) -> Result<Self, AppError> {
        Ok(Self {
            tokens: TokenIssuer::new(&config.jwt_secret, config.jwt_ttl),
            config: Arc::new(config),
            users: postgres_collection(&pool).await?,
            timelines: postgres_collection(&pool).await?,
            messages: postgres_collection(&pool).await?,
            skills: postgres_collection(&pool).await?,
            software_applications: postgres_collection(&pool).await?,
            projects: postgres_collection(&pool).await?,
        })
    }
}

async fn postgres_collection<T: Document>(pool: &PgPool) -> Result<Repository<T>, AppError> {
    let repository = PostgresDocumentRepository::<T>::new(pool.clone());
    repository.ensure_schema().await?;
    Ok(Arc::new(repository))
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Route {0} not found")]
    RouteNotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal Server Error")]
    Internal,

    #[error("Internal Server Error")]
    Panic(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) | AppError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::JwtError(_)
            | AppError::DatabaseError(_)
            | AppError::Internal
            | AppError::Panic(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn stack(&self) -> String {
        match self {
            AppError::Panic(payload) => format!("panic: {payload}"),
            other => format!("{other:?}"),
        }
    }
}

/// Uniform JSON body of every failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            stack: None,
        }
    }
}

/// Success body that carries only a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Rejects blank required fields, naming the first one missing
pub fn require_fields(fields: &[(&str, &str)]) -> Result<(), AppError> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(AppError::BadRequest(format!("{name} is required"))),
        None => Ok(()),
    }
}

/// Error details attached to the response so `normalize_errors` can expose
/// the stack in development
#[derive(Debug, Clone)]
struct ErrorDetail {
    message: String,
    stack: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!(error = ?self, "Request failed");
        } else {
            warn!(status = status.as_u16(), message = %message, "Request rejected");
        }

        let detail = ErrorDetail {
            message: message.clone(),
            stack: self.stack(),
        };
        let mut response = (status, Json(ErrorEnvelope::new(message))).into_response();
        response.extensions_mut().insert(detail);
        response
    }
}

/// Fallback for any path that no router mounts
pub async fn route_not_found(OriginalUri(uri): OriginalUri) -> AppError {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    AppError::RouteNotFound(path)
}

/// Converts a caught handler panic into the error envelope
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Panic(detail).into_response()
}

/// Error normalizer: every failed request leaves as exactly one JSON envelope.
///
/// `AppError` responses gain a `stack` in development, 405s become route
/// not-found errors, and any other error response (extractor rejections and
/// the like) is wrapped with its text as the message.
pub async fn normalize_errors(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let original_url = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let development = state.config.environment.is_development();

    if status == StatusCode::METHOD_NOT_ALLOWED {
        let response = AppError::RouteNotFound(original_url).into_response();
        return with_stack(response, development);
    }

    if response.extensions().get::<ErrorDetail>().is_some() {
        return with_stack(response, development);
    }

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, MAX_ERROR_BODY).await.unwrap_or_default();
    let text = String::from_utf8_lossy(&bytes).trim().to_string();
    let message = if text.is_empty() {
        parts
            .status
            .canonical_reason()
            .unwrap_or("Internal Server Error")
            .to_string()
    } else {
        text
    };

    warn!(status = parts.status.as_u16(), message = %message, "Normalizing error response");

    let envelope = ErrorEnvelope {
        stack: development.then(|| format!("{} at {}", parts.status, original_url)),
        ..ErrorEnvelope::new(message)
    };
    (parts.status, Json(envelope)).into_response()
}

fn with_stack(response: Response, development: bool) -> Response {
    if !development {
        return response;
    }

    let Some(detail) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    let envelope = ErrorEnvelope {
        stack: Some(detail.stack.clone()),
        ..ErrorEnvelope::new(detail.message.clone())
    };
    let mut rebuilt = (response.status(), Json(envelope)).into_response();
    rebuilt.extensions_mut().insert(detail);
    rebuilt
}
