use serde::{Deserialize, Serialize};

use crate::user::models::UserModel;

/// JWT claims carried by the session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    pub id: String,
    pub iat: usize,
    pub exp: usize,
    /// Unique token id so two tokens never collide
    pub jti: String,
}

/// The authenticated user, inserted into request extensions by `require_auth`
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserModel);
