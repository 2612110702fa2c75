use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::AddSkillRequest;
use crate::shared::{require_fields, AppError};
use crate::store::{new_id, Document};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillModel {
    pub id: String,
    pub title: String,
    /// Percentage, 0 to 100
    pub proficiency: u8,
    pub svg: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Document for SkillModel {
    const COLLECTION: &'static str = "skills";

    fn id(&self) -> &str {
        &self.id
    }
}

impl SkillModel {
    pub fn from_request(request: AddSkillRequest) -> Result<Self, AppError> {
        require_fields(&[("Title", request.title.as_str())])?;
        let proficiency = request
            .proficiency
            .ok_or_else(|| AppError::BadRequest("Proficiency is required".to_string()))?;

        Ok(Self {
            id: new_id(),
            title: request.title.trim().to_string(),
            proficiency: validate_proficiency(proficiency)?,
            svg: request.svg.filter(|svg| !svg.trim().is_empty()),
            created_at: Utc::now(),
        })
    }
}

pub fn validate_proficiency(value: i64) -> Result<u8, AppError> {
    u8::try_from(value)
        .ok()
        .filter(|p| *p <= 100)
        .ok_or_else(|| AppError::BadRequest("Proficiency must be between 0 and 100".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Some(0))]
    #[case(85, Some(85))]
    #[case(100, Some(100))]
    #[case(101, None)]
    #[case(-1, None)]
    #[case(1000, None)]
    fn test_validate_proficiency(#[case] value: i64, #[case] expected: Option<u8>) {
        assert_eq!(validate_proficiency(value).ok(), expected);
    }

    #[test]
    fn test_from_request_requires_proficiency() {
        let result = SkillModel::from_request(AddSkillRequest {
            title: "Rust".to_string(),
            proficiency: None,
            svg: None,
        });
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_from_request() {
        let skill = SkillModel::from_request(AddSkillRequest {
            title: "Rust".to_string(),
            proficiency: Some(90),
            svg: Some("https://cdn.example/rust.svg".to_string()),
        })
        .unwrap();

        assert_eq!(skill.proficiency, 90);
        assert_eq!(skill.svg.as_deref(), Some("https://cdn.example/rust.svg"));
    }
}
