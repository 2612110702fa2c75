use axum::{
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, instrument};

use crate::config::Config;
use crate::shared::{AppError, AppState};
use crate::user::{models::UserModel, types::PublicUser};

/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

const COOKIE_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

/// The `token` cookie as written to `Set-Cookie`
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCookie {
    pub value: String,
    pub expires: DateTime<Utc>,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: &'static str,
}

impl SessionCookie {
    /// Cookie holding a fresh token, valid for `COOKIE_EXPIRE` days.
    /// The API and the front-ends live on different origins, so SameSite=None.
    pub fn for_token(token: String, config: &Config) -> Result<Self, AppError> {
        let expires = Duration::try_days(config.cookie_expire_days)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                error!(
                    cookie_expire_days = config.cookie_expire_days,
                    "Cookie expiry is out of range"
                );
                AppError::Internal
            })?;

        Ok(Self::expiring(token, expires, config))
    }

    /// Empty cookie that expires immediately, used on logout
    pub fn cleared(config: &Config) -> Self {
        Self::expiring(String::new(), Utc::now(), config)
    }

    fn expiring(value: String, expires: DateTime<Utc>, config: &Config) -> Self {
        Self {
            value,
            expires,
            http_only: true,
            secure: config.environment.is_production(),
            same_site: SameSite::None,
            path: "/",
        }
    }

    pub fn to_header_value(&self) -> Result<HeaderValue, AppError> {
        HeaderValue::from_str(&self.to_string()).map_err(|e| {
            AppError::BadRequest(format!("Token cannot be stored in a cookie: {e}"))
        })
    }
}

impl fmt::Display for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", TOKEN_COOKIE, self.value)?;
        write!(f, "; Path={}", self.path)?;
        write!(f, "; Expires={}", self.expires.format(COOKIE_DATE_FORMAT))?;
        if self.http_only {
            write!(f, "; HttpOnly")?;
        }
        if self.secure {
            write!(f, "; Secure")?;
        }
        write!(f, "; SameSite={}", self.same_site)
    }
}

/// Body of a login/registration response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicUser,
    pub token: String,
}

/// Issues a token for `user`, sets it as the `token` cookie and writes the
/// JSON body, all as one response.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub fn send_token(
    state: &AppState,
    user: &UserModel,
    message: &str,
    status: StatusCode,
) -> Result<Response, AppError> {
    let token = state.tokens.issue(&user.id)?;
    let cookie = SessionCookie::for_token(token.clone(), &state.config)?;
    let header = cookie.to_header_value()?;

    info!(expires = %cookie.expires, secure = cookie.secure, "Session cookie issued");

    let body = TokenResponse {
        success: true,
        message: message.to_string(),
        user: PublicUser::from(user),
        token,
    };

    Ok((status, [(SET_COOKIE, header)], Json(body)).into_response())
}

/// Reads a cookie value from the request headers
pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all("cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(cookie_name, _)| cookie_name.trim() == name)
        .map(|(_, value)| value.trim().to_string())
}
