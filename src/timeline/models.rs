use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::AddTimelineRequest;
use crate::shared::{require_fields, AppError};
use crate::store::{new_id, Document};

/// Period covered by a timeline entry; `to` is open while ongoing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePeriod {
    pub from: String,
    pub to: Option<String>,
}

/// Education/experience entry shown on the portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineModel {
    pub id: String,
    pub title: String,
    pub description: String,
    pub timeline: TimelinePeriod,
    pub created_at: DateTime<Utc>,
}

impl Document for TimelineModel {
    const COLLECTION: &'static str = "timelines";

    fn id(&self) -> &str {
        &self.id
    }
}

impl TimelineModel {
    /// Validates the request and builds a new entry
    pub fn from_request(request: AddTimelineRequest) -> Result<Self, AppError> {
        require_fields(&[
            ("Title", request.title.as_str()),
            ("Description", request.description.as_str()),
            ("From", request.from.as_str()),
        ])?;

        Ok(Self {
            id: new_id(),
            title: request.title.trim().to_string(),
            description: request.description,
            timeline: TimelinePeriod {
                from: request.from.trim().to_string(),
                to: request
                    .to
                    .map(|to| to.trim().to_string())
                    .filter(|to| !to.is_empty()),
            },
            created_at: Utc::now(),
        })
    }
}
