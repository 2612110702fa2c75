use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{require_fields, AppError};
use crate::store::{new_id, Document};

/// Software/tool the portfolio owner works with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareApplicationModel {
    pub id: String,
    pub name: String,
    pub svg: String,
    pub created_at: DateTime<Utc>,
}

impl Document for SoftwareApplicationModel {
    const COLLECTION: &'static str = "software_applications";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddSoftwareApplicationRequest {
    pub name: String,
    pub svg: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareApplicationResponse {
    pub success: bool,
    pub message: String,
    pub software_application: SoftwareApplicationModel,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareApplicationsResponse {
    pub success: bool,
    pub software_applications: Vec<SoftwareApplicationModel>,
}

impl SoftwareApplicationModel {
    pub fn from_request(request: AddSoftwareApplicationRequest) -> Result<Self, AppError> {
        require_fields(&[
            ("Name", request.name.as_str()),
            ("Software application icon", request.svg.as_str()),
        ])?;

        Ok(Self {
            id: new_id(),
            name: request.name.trim().to_string(),
            svg: request.svg.trim().to_string(),
            created_at: Utc::now(),
        })
    }
}
