use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{new_id, Document};

/// Stored user document, including the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserModel {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub about_me: String,
    pub password_hash: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default, rename = "portfolioURL")]
    pub portfolio_url: Option<String>,
    #[serde(default, rename = "githubURL")]
    pub github_url: Option<String>,
    #[serde(default, rename = "instagramURL")]
    pub instagram_url: Option<String>,
    #[serde(default, rename = "twitterURL")]
    pub twitter_url: Option<String>,
    #[serde(default, rename = "linkedInURL")]
    pub linked_in_url: Option<String>,
    #[serde(default, rename = "facebookURL")]
    pub facebook_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Document for UserModel {
    const COLLECTION: &'static str = "users";
    const UNIQUE_FIELDS: &'static [&'static str] = &["email"];

    fn id(&self) -> &str {
        &self.id
    }
}

impl UserModel {
    pub fn new(
        full_name: String,
        email: String,
        phone: String,
        about_me: String,
        password_hash: String,
    ) -> Self {
        Self {
            id: new_id(),
            full_name,
            email,
            phone,
            about_me,
            password_hash,
            avatar: None,
            resume: None,
            portfolio_url: None,
            github_url: None,
            instagram_url: None,
            twitter_url: None,
            linked_in_url: None,
            facebook_url: None,
            created_at: Utc::now(),
        }
    }

    #[cfg(test)]
    pub fn new_for_tests(email: &str) -> Self {
        Self::new(
            "Test Owner".to_string(),
            email.to_string(),
            "555-0100".to_string(),
            "Writes software".to_string(),
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaA".to_string(),
        )
    }
}

/// Normalizes an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal shape check: one `@` with text on both sides and a dot in the domain
pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
