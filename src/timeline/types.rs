use serde::{Deserialize, Serialize};

use super::models::TimelineModel;

/// Request payload for adding a timeline entry
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddTimelineRequest {
    pub title: String,
    pub description: String,
    pub from: String,
    pub to: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TimelineResponse {
    pub success: bool,
    pub message: String,
    pub timeline: TimelineModel,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TimelinesResponse {
    pub success: bool,
    pub timelines: Vec<TimelineModel>,
}
