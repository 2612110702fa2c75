use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};

use super::types::TokenClaims;
use crate::shared::AppError;

/// Signs and verifies the bearer tokens handed out at login
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Creates a signed token for the given user id
    #[instrument(skip(self))]
    pub fn issue(&self, user_id: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| {
                debug!(ttl_seconds = self.ttl.num_seconds(), "Token expiry is out of range");
                AppError::JwtError("token lifetime is out of range".to_string())
            })?
            .timestamp() as usize;

        debug!(
            ttl_seconds = self.ttl.num_seconds(),
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = TokenClaims {
            id: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Validates signature and expiry, returning the claims
    #[instrument(skip(self, token))]
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode::<TokenClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| {
                debug!(user_id = %data.claims.id, exp = data.claims.exp, "JWT token decoded successfully");
                data.claims
            })
            .map_err(|e| {
                debug!(error = %e, "Failed to decode JWT token");
                AppError::Unauthorized("Invalid or expired token".to_string())
            })
    }
}
