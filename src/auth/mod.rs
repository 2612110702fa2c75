// Public API - what other modules can use
pub use cookies::{send_token, SessionCookie, TokenResponse, TOKEN_COOKIE};
pub use cors::{cors_layer, is_allowed_origin};
pub use middleware::require_auth;
pub use password::{hash_password, verify_password};
pub use token::TokenIssuer;
pub use types::{AuthUser, TokenClaims};

// Internal modules
pub mod cookies;
mod cors;
mod middleware;
mod password;
mod token;
mod types;
