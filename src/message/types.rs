use serde::{Deserialize, Serialize};

use super::models::MessageModel;

/// Request payload for the public contact form
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendMessageRequest {
    pub sender_name: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageSentResponse {
    pub success: bool,
    pub message: String,
    pub data: MessageModel,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub success: bool,
    pub messages: Vec<MessageModel>,
}
