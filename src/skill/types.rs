use serde::{Deserialize, Serialize};

use super::models::SkillModel;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddSkillRequest {
    pub title: String,
    pub proficiency: Option<i64>,
    pub svg: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateSkillRequest {
    pub proficiency: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SkillResponse {
    pub success: bool,
    pub message: String,
    pub skill: SkillModel,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SkillsResponse {
    pub success: bool,
    pub skills: Vec<SkillModel>,
}
