use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{is_valid_email, normalize_email, UserModel},
    types::{LoginRequest, RegisterRequest, UpdatePasswordRequest, UpdateProfileRequest},
};
use crate::auth::{hash_password, verify_password};
use crate::shared::{require_fields, AppError};
use crate::store::DocumentRepository;

const INVALID_CREDENTIALS: &str = "Invalid Email or Password";

/// Service for account business logic
pub struct UserService {
    repository: Arc<dyn DocumentRepository<UserModel>>,
}

impl UserService {
    pub fn new(repository: Arc<dyn DocumentRepository<UserModel>>) -> Self {
        Self { repository }
    }

    /// Creates a new account; emails are unique
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<UserModel, AppError> {
        require_fields(&[
            ("Full name", request.full_name.as_str()),
            ("Email", request.email.as_str()),
            ("Phone", request.phone.as_str()),
            ("About me", request.about_me.as_str()),
            ("Password", request.password.as_str()),
        ])?;

        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            return Err(AppError::BadRequest("Please provide a valid email".to_string()));
        }

        if self.repository.find_one_by("email", email.as_str()).await?.is_some() {
            warn!("Registration attempted with an email already in use");
            return Err(AppError::Conflict("User already registered".to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let mut user = UserModel::new(
            request.full_name.trim().to_string(),
            email,
            request.phone.trim().to_string(),
            request.about_me,
            password_hash,
        );
        user.avatar = request.avatar;
        user.resume = request.resume;
        user.portfolio_url = request.portfolio_url;
        user.github_url = request.github_url;
        user.instagram_url = request.instagram_url;
        user.twitter_url = request.twitter_url;
        user.linked_in_url = request.linked_in_url;
        user.facebook_url = request.facebook_url;

        // The lookup above only spares the hash; the store decides races.
        self.repository
            .insert(&user)
            .await
            .map_err(|e| email_conflict(e, "User already registered"))?;

        info!(user_id = %user.id, "User registered successfully");
        Ok(user)
    }

    /// Checks credentials and returns the matching user
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<UserModel, AppError> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AppError::BadRequest(
                "Please provide email and password".to_string(),
            ));
        }

        let user = self
            .repository
            .find_one_by("email", &normalize_email(&request.email))
            .await?
            .ok_or_else(|| {
                warn!("Login attempted for unknown email");
                AppError::Unauthorized(INVALID_CREDENTIALS.to_string())
            })?;

        if !verify_password(&request.password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login attempted with wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Applies a partial profile update
    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn update_profile(
        &self,
        mut user: UserModel,
        request: UpdateProfileRequest,
    ) -> Result<UserModel, AppError> {
        if let Some(email) = request.email {
            let email = normalize_email(&email);
            if !is_valid_email(&email) {
                return Err(AppError::BadRequest("Please provide a valid email".to_string()));
            }
            if email != user.email {
                if let Some(other) = self.repository.find_one_by("email", email.as_str()).await? {
                    if other.id != user.id {
                        return Err(AppError::Conflict("Email already in use".to_string()));
                    }
                }
                user.email = email;
            }
        }

        if let Some(full_name) = request.full_name {
            require_fields(&[("Full name", full_name.as_str())])?;
            user.full_name = full_name.trim().to_string();
        }
        if let Some(phone) = request.phone {
            require_fields(&[("Phone", phone.as_str())])?;
            user.phone = phone.trim().to_string();
        }
        if let Some(about_me) = request.about_me {
            user.about_me = about_me;
        }

        merge_optional(&mut user.avatar, request.avatar);
        merge_optional(&mut user.resume, request.resume);
        merge_optional(&mut user.portfolio_url, request.portfolio_url);
        merge_optional(&mut user.github_url, request.github_url);
        merge_optional(&mut user.instagram_url, request.instagram_url);
        merge_optional(&mut user.twitter_url, request.twitter_url);
        merge_optional(&mut user.linked_in_url, request.linked_in_url);
        merge_optional(&mut user.facebook_url, request.facebook_url);

        self.repository
            .replace(&user)
            .await
            .map_err(|e| email_conflict(e, "Email already in use"))?;

        info!("Profile updated");
        Ok(user)
    }

    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn update_password(
        &self,
        mut user: UserModel,
        request: UpdatePasswordRequest,
    ) -> Result<(), AppError> {
        if request.current_password.is_empty()
            || request.new_password.is_empty()
            || request.confirm_new_password.is_empty()
        {
            return Err(AppError::BadRequest("Please fill all fields".to_string()));
        }

        if !verify_password(&request.current_password, &user.password_hash)? {
            return Err(AppError::BadRequest("Incorrect current password".to_string()));
        }

        if request.new_password != request.confirm_new_password {
            return Err(AppError::BadRequest(
                "New password and confirm new password do not match".to_string(),
            ));
        }

        user.password_hash = hash_password(&request.new_password)?;
        self.repository.replace(&user).await?;

        info!("Password updated");
        Ok(())
    }

    /// The portfolio owner is the first registered account
    #[instrument(skip(self))]
    pub async fn portfolio_owner(&self) -> Result<UserModel, AppError> {
        self.repository
            .list()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Portfolio user not found".to_string()))
    }
}

fn email_conflict(error: AppError, message: &str) -> AppError {
    match error {
        AppError::Conflict(_) => {
            warn!("Email already taken by another account");
            AppError::Conflict(message.to_string())
        }
        other => other,
    }
}

/// Empty strings clear an optional field, other values replace it
fn merge_optional(field: &mut Option<String>, update: Option<String>) {
    if let Some(value) = update {
        let value = value.trim().to_string();
        *field = if value.is_empty() { None } else { Some(value) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDocumentRepository;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryDocumentRepository::new()))
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            full_name: "Portfolio Owner".to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            about_me: "Builds things".to_string(),
            password: "correct horse".to_string(),
            github_url: Some("https://github.com/owner".to_string()),
            ..RegisterRequest::default()
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let service = service();
        let user = service
            .register(register_request("Owner@Example.com"))
            .await
            .unwrap();

        assert_eq!(user.email, "owner@example.com");
        assert_ne!(user.password_hash, "correct horse");
        assert_eq!(user.github_url.as_deref(), Some("https://github.com/owner"));

        let logged_in = service
            .login(login_request("owner@example.com", "correct horse"))
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let mut request = register_request("owner@example.com");
        request.phone = "  ".to_string();

        let result = service().register(request).await;
        match result {
            Err(AppError::BadRequest(message)) => assert_eq!(message, "Phone is required"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let result = service().register(register_request("not-an-email")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = service();
        service
            .register(register_request("owner@example.com"))
            .await
            .unwrap();

        let result = service.register(register_request("OWNER@example.com")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_create_one_account() {
        let repository = Arc::new(InMemoryDocumentRepository::<UserModel>::new());
        let service = Arc::new(UserService::new(repository.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.register(register_request("dup@example.com")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::Conflict(message)) => assert_eq!(message, "User already registered"),
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(created, 1);
        let accounts = repository.list().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].email, "dup@example.com");
    }

    #[tokio::test]
    async fn test_login_failures_share_message() {
        let service = service();
        service
            .register(register_request("owner@example.com"))
            .await
            .unwrap();

        let wrong_password = service
            .login(login_request("owner@example.com", "wrong password"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(login_request("nobody@example.com", "correct horse"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), INVALID_CREDENTIALS);
        assert_eq!(unknown_email.to_string(), INVALID_CREDENTIALS);
        assert!(matches!(
            service.login(login_request("", "")).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_update_profile_partial() {
        let service = service();
        let user = service
            .register(register_request("owner@example.com"))
            .await
            .unwrap();

        let request = UpdateProfileRequest {
            about_me: Some("Now writes Rust".to_string()),
            github_url: Some(String::new()),
            twitter_url: Some("https://twitter.com/owner".to_string()),
            ..UpdateProfileRequest::default()
        };
        let updated = service.update_profile(user.clone(), request).await.unwrap();

        assert_eq!(updated.about_me, "Now writes Rust");
        assert_eq!(updated.full_name, user.full_name);
        assert!(updated.github_url.is_none());
        assert_eq!(
            updated.twitter_url.as_deref(),
            Some("https://twitter.com/owner")
        );
    }

    #[tokio::test]
    async fn test_update_profile_email_conflict() {
        let service = service();
        let owner = service
            .register(register_request("owner@example.com"))
            .await
            .unwrap();
        service
            .register(register_request("other@example.com"))
            .await
            .unwrap();

        let request = UpdateProfileRequest {
            email: Some("other@example.com".to_string()),
            ..UpdateProfileRequest::default()
        };
        let result = service.update_profile(owner, request).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_password() {
        let service = service();
        let user = service
            .register(register_request("owner@example.com"))
            .await
            .unwrap();

        let mismatch = UpdatePasswordRequest {
            current_password: "correct horse".to_string(),
            new_password: "battery staple".to_string(),
            confirm_new_password: "battery stapler".to_string(),
        };
        assert!(matches!(
            service.update_password(user.clone(), mismatch).await,
            Err(AppError::BadRequest(_))
        ));

        let wrong_current = UpdatePasswordRequest {
            current_password: "nope nope".to_string(),
            new_password: "battery staple".to_string(),
            confirm_new_password: "battery staple".to_string(),
        };
        assert!(matches!(
            service.update_password(user.clone(), wrong_current).await,
            Err(AppError::BadRequest(_))
        ));

        let request = UpdatePasswordRequest {
            current_password: "correct horse".to_string(),
            new_password: "battery staple".to_string(),
            confirm_new_password: "battery staple".to_string(),
        };
        service.update_password(user, request).await.unwrap();

        assert!(service
            .login(login_request("owner@example.com", "battery staple"))
            .await
            .is_ok());
        assert!(service
            .login(login_request("owner@example.com", "correct horse"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_portfolio_owner_is_first_user() {
        let service = service();
        assert!(matches!(
            service.portfolio_owner().await,
            Err(AppError::NotFound(_))
        ));

        let first = service
            .register(register_request("owner@example.com"))
            .await
            .unwrap();
        service
            .register(register_request("second@example.com"))
            .await
            .unwrap();

        assert_eq!(service.portfolio_owner().await.unwrap().id, first.id);
    }
}
