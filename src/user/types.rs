use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::UserModel;

/// User as exposed over the API, without the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub about_me: String,
    pub avatar: Option<String>,
    pub resume: Option<String>,
    #[serde(rename = "portfolioURL")]
    pub portfolio_url: Option<String>,
    #[serde(rename = "githubURL")]
    pub github_url: Option<String>,
    #[serde(rename = "instagramURL")]
    pub instagram_url: Option<String>,
    #[serde(rename = "twitterURL")]
    pub twitter_url: Option<String>,
    #[serde(rename = "linkedInURL")]
    pub linked_in_url: Option<String>,
    #[serde(rename = "facebookURL")]
    pub facebook_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&UserModel> for PublicUser {
    fn from(user: &UserModel) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            about_me: user.about_me.clone(),
            avatar: user.avatar.clone(),
            resume: user.resume.clone(),
            portfolio_url: user.portfolio_url.clone(),
            github_url: user.github_url.clone(),
            instagram_url: user.instagram_url.clone(),
            twitter_url: user.twitter_url.clone(),
            linked_in_url: user.linked_in_url.clone(),
            facebook_url: user.facebook_url.clone(),
            created_at: user.created_at,
        }
    }
}

/// Request payload for registering the portfolio owner
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub about_me: String,
    pub password: String,
    pub avatar: Option<String>,
    pub resume: Option<String>,
    #[serde(rename = "portfolioURL")]
    pub portfolio_url: Option<String>,
    #[serde(rename = "githubURL")]
    pub github_url: Option<String>,
    #[serde(rename = "instagramURL")]
    pub instagram_url: Option<String>,
    #[serde(rename = "twitterURL")]
    pub twitter_url: Option<String>,
    #[serde(rename = "linkedInURL")]
    pub linked_in_url: Option<String>,
    #[serde(rename = "facebookURL")]
    pub facebook_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub about_me: Option<String>,
    pub avatar: Option<String>,
    pub resume: Option<String>,
    #[serde(rename = "portfolioURL")]
    pub portfolio_url: Option<String>,
    #[serde(rename = "githubURL")]
    pub github_url: Option<String>,
    #[serde(rename = "instagramURL")]
    pub instagram_url: Option<String>,
    #[serde(rename = "twitterURL")]
    pub twitter_url: Option<String>,
    #[serde(rename = "linkedInURL")]
    pub linked_in_url: Option<String>,
    #[serde(rename = "facebookURL")]
    pub facebook_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: PublicUser,
}
