use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{AddProjectRequest, UpdateProjectRequest};
use crate::shared::{require_fields, AppError};
use crate::store::{new_id, Document};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectModel {
    pub id: String,
    pub title: String,
    pub description: String,
    pub git_repo_link: String,
    pub project_link: String,
    pub technologies: String,
    pub stack: String,
    pub deployed: String,
    pub project_banner: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Document for ProjectModel {
    const COLLECTION: &'static str = "projects";

    fn id(&self) -> &str {
        &self.id
    }
}

impl ProjectModel {
    pub fn from_request(request: AddProjectRequest) -> Result<Self, AppError> {
        require_fields(&[
            ("Title", request.title.as_str()),
            ("Description", request.description.as_str()),
            ("Git repository link", request.git_repo_link.as_str()),
            ("Project link", request.project_link.as_str()),
            ("Technologies", request.technologies.as_str()),
            ("Stack", request.stack.as_str()),
            ("Deployed", request.deployed.as_str()),
        ])?;

        Ok(Self {
            id: new_id(),
            title: request.title.trim().to_string(),
            description: request.description,
            git_repo_link: request.git_repo_link.trim().to_string(),
            project_link: request.project_link.trim().to_string(),
            technologies: request.technologies.trim().to_string(),
            stack: request.stack.trim().to_string(),
            deployed: request.deployed.trim().to_string(),
            project_banner: request
                .project_banner
                .map(|banner| banner.trim().to_string())
                .filter(|banner| !banner.is_empty()),
            created_at: Utc::now(),
        })
    }

    /// Applies a partial update; required fields cannot be blanked
    pub fn apply(&mut self, update: UpdateProjectRequest) -> Result<(), AppError> {
        fn set(field: &mut String, name: &str, value: Option<String>) -> Result<(), AppError> {
            if let Some(value) = value {
                require_fields(&[(name, value.as_str())])?;
                *field = value.trim().to_string();
            }
            Ok(())
        }

        let mut next = self.clone();
        set(&mut next.title, "Title", update.title)?;
        set(&mut next.description, "Description", update.description)?;
        set(&mut next.git_repo_link, "Git repository link", update.git_repo_link)?;
        set(&mut next.project_link, "Project link", update.project_link)?;
        set(&mut next.technologies, "Technologies", update.technologies)?;
        set(&mut next.stack, "Stack", update.stack)?;
        set(&mut next.deployed, "Deployed", update.deployed)?;

        if let Some(banner) = update.project_banner {
            let banner = banner.trim().to_string();
            next.project_banner = if banner.is_empty() { None } else { Some(banner) };
        }

        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_request() -> AddProjectRequest {
        AddProjectRequest {
            title: "Portfolio API".to_string(),
            description: "Backend for my site".to_string(),
            git_repo_link: "https://github.com/owner/portfolio-api".to_string(),
            project_link: "https://portfolio.example".to_string(),
            technologies: "Rust, axum".to_string(),
            stack: "Backend".to_string(),
            deployed: "Yes".to_string(),
            project_banner: None,
        }
    }

    #[test]
    fn test_from_request_requires_every_field() {
        let result = ProjectModel::from_request(AddProjectRequest {
            stack: " ".to_string(),
            ..add_request()
        });
        match result {
            Err(AppError::BadRequest(message)) => assert_eq!(message, "Stack is required"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_apply_partial_update() {
        let mut project = ProjectModel::from_request(add_request()).unwrap();
        project
            .apply(UpdateProjectRequest {
                deployed: Some("No".to_string()),
                project_banner: Some("https://cdn.example/banner.png".to_string()),
                ..UpdateProjectRequest::default()
            })
            .unwrap();

        assert_eq!(project.deployed, "No");
        assert_eq!(project.title, "Portfolio API");
        assert_eq!(
            project.project_banner.as_deref(),
            Some("https://cdn.example/banner.png")
        );
    }

    #[test]
    fn test_apply_rejects_blank_required_field() {
        let mut project = ProjectModel::from_request(add_request()).unwrap();
        let result = project.apply(UpdateProjectRequest {
            title: Some(String::new()),
            ..UpdateProjectRequest::default()
        });

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(project.title, "Portfolio API");
    }
}
