use serde::{Deserialize, Serialize};

use super::models::ProjectModel;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddProjectRequest {
    pub title: String,
    pub description: String,
    pub git_repo_link: String,
    pub project_link: String,
    pub technologies: String,
    pub stack: String,
    pub deployed: String,
    pub project_banner: Option<String>,
}

/// Partial project update; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub git_repo_link: Option<String>,
    pub project_link: Option<String>,
    pub technologies: Option<String>,
    pub stack: Option<String>,
    pub deployed: Option<String>,
    pub project_banner: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub project: ProjectModel,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectsResponse {
    pub success: bool,
    pub projects: Vec<ProjectModel>,
}
