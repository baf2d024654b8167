//! Session tokens for the two authorization domains.
//!
//! Admin (dashboard viewer) and student (alert submitter) sessions are
//! separate HS256 tokens in separate cookies; holding one never implies the
//! other. Tokens are signed with the configured `session_secret` and expire
//! after `session_ttl_hours`.

use axum::http::HeaderMap;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const STUDENT_COOKIE: &str = "sos_student_session";
pub const ADMIN_COOKIE: &str = "sos_admin_session";
/// Short-lived cookie holding the OAuth `state` value between the redirect
/// to the provider and the callback.
pub const OAUTH_STATE_COOKIE: &str = "sos_oauth_state";

/// Claims of a student session established through the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct StudentClaims {
    pub exp: usize,
    /// Institutional email, already checked against the allowed domain.
    pub email: String,
    pub name: String,
}

/// Claims of an admin session established through the shared password.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    pub exp: usize,
    pub role: String,
}

pub const ADMIN_ROLE: &str = "admin";

fn expiry(ttl_hours: i64) -> usize {
    (OffsetDateTime::now_utc() + time::Duration::hours(ttl_hours)).unix_timestamp() as usize
}

pub fn issue_student_token(
    email: &str,
    name: &str,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = StudentClaims {
        exp: expiry(ttl_hours),
        email: email.to_string(),
        name: name.to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn issue_admin_token(
    secret: &str,
    ttl_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = AdminClaims {
        exp: expiry(ttl_hours),
        role: ADMIN_ROLE.to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_student_token(
    token: &str,
    secret: &str,
) -> Result<StudentClaims, jsonwebtoken::errors::Error> {
    let data = decode::<StudentClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

pub fn verify_admin_token(
    token: &str,
    secret: &str,
) -> Result<AdminClaims, jsonwebtoken::errors::Error> {
    let data = decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    if data.claims.role != ADMIN_ROLE {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }
    Ok(data.claims)
}

/// `Set-Cookie` value for a session cookie.
pub fn set_cookie(name: &str, token: &str, max_age_secs: i64) -> String {
    format!("{name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// `Set-Cookie` value that removes a cookie.
pub fn clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Look up a cookie value in request headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get("cookie")?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then(|| v.to_string())
    })
}

/// Generate an unguessable OAuth `state` value.
pub fn generate_state() -> String {
    use base64::Engine;
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes).expect("Failed to generate random bytes");
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
