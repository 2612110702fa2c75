use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::SendMessageRequest;
use crate::shared::{require_fields, AppError};
use crate::store::{new_id, Document};

const MIN_NAME_LENGTH: usize = 2;
const MIN_SUBJECT_LENGTH: usize = 2;
const MIN_MESSAGE_LENGTH: usize = 2;

/// Contact message left by a portfolio visitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageModel {
    pub id: String,
    pub sender_name: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Document for MessageModel {
    const COLLECTION: &'static str = "messages";

    fn id(&self) -> &str {
        &self.id
    }
}

impl MessageModel {
    pub fn from_request(request: SendMessageRequest) -> Result<Self, AppError> {
        require_fields(&[
            ("Sender name", request.sender_name.as_str()),
            ("Subject", request.subject.as_str()),
            ("Message", request.message.as_str()),
        ])?;

        let sender_name = request.sender_name.trim().to_string();
        let subject = request.subject.trim().to_string();
        let message = request.message.trim().to_string();

        if sender_name.chars().count() < MIN_NAME_LENGTH {
            return Err(AppError::BadRequest(format!(
                "Name must contain at least {MIN_NAME_LENGTH} characters"
            )));
        }
        if subject.chars().count() < MIN_SUBJECT_LENGTH {
            return Err(AppError::BadRequest(format!(
                "Subject must contain at least {MIN_SUBJECT_LENGTH} characters"
            )));
        }
        if message.chars().count() < MIN_MESSAGE_LENGTH {
            return Err(AppError::BadRequest(format!(
                "Message must contain at least {MIN_MESSAGE_LENGTH} characters"
            )));
        }

        Ok(Self {
            id: new_id(),
            sender_name,
            subject,
            message,
            created_at: Utc::now(),
        })
    }
}
