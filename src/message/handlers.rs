use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    models::MessageModel,
    types::{MessageSentResponse, MessagesResponse, SendMessageRequest},
};
use crate::auth::require_auth;
use crate::shared::{AppError, AppState, MessageResponse};
use crate::store::find_or_not_found;

/// Routes mounted under /api/v1/message
pub fn router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/delete/:id", delete(delete_message))
        .route("/getall", get(get_all_messages))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/send", post(send_message))
        .merge(protected)
}

/// POST /send
/// Public contact form endpoint
#[instrument(name = "send_message", skip(state, request))]
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageSentResponse>), AppError> {
    let message = MessageModel::from_request(request)?;
    state.messages.insert(&message).await?;

    info!(message_id = %message.id, "Message received");

    Ok((
        StatusCode::CREATED,
        Json(MessageSentResponse {
            success: true,
            message: "Message Sent!".to_string(),
            data: message,
        }),
    ))
}

/// DELETE /delete/:id
#[instrument(name = "delete_message", skip(state))]
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = find_or_not_found(state.messages.as_ref(), &id, "Message").await?;
    state.messages.delete(&message.id).await?;

    info!(message_id = %id, "Message deleted");
    Ok(Json(MessageResponse::new("Message Deleted!")))
}

/// GET /getall
#[instrument(name = "get_all_messages", skip(state))]
pub async fn get_all_messages(
    State(state): State<AppState>,
) -> Result<Json<MessagesResponse>, AppError> {
    let messages = state.messages.list().await?;

    info!(message_count = messages.len(), "Messages listed");
    Ok(Json(MessagesResponse {
        success: true,
        messages,
    }))
}
