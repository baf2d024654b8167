//! Authentication extractors for the two session gates.
//!
//! The admin and student gates are fully independent authorization domains;
//! each extractor checks only its own cookie. A missing or invalid session
//! redirects to the matching login flow instead of surfacing an error.

use crate::AppResources;
use crate::session::{
    ADMIN_COOKIE, STUDENT_COOKIE, StudentClaims, cookie_value, verify_admin_token,
    verify_student_token,
};
use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON error body for API endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code (e.g. "bad_request", "forbidden")
    pub error: String,
    /// Human-readable error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl ApiError {
    pub fn bad_request(description: impl Into<String>) -> Self {
        Self {
            error: "bad_request".to_string(),
            error_description: Some(description.into()),
        }
    }

    pub fn forbidden(description: impl Into<String>) -> Self {
        Self {
            error: "forbidden".to_string(),
            error_description: Some(description.into()),
        }
    }

    pub fn server_error() -> Self {
        Self {
            error: "server_error".to_string(),
            error_description: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.as_str() {
            "bad_request" => StatusCode::BAD_REQUEST,
            "forbidden" => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Rejection that sends the browser to a login flow.
pub struct AuthRedirect(&'static str);

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        Redirect::to(self.0).into_response()
    }
}

/// Extractor for the student gate. Yields the verified session claims;
/// rejects by redirecting to the provider login flow.
pub struct StudentAuth(pub StudentClaims);

impl<S> FromRequestParts<S> for StudentAuth
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let resources = parts
            .extensions
            .get::<AppResources>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("AppResources not found in extensions");
                ApiError::server_error().into_response()
            })?;

        let token = cookie_value(&parts.headers, STUDENT_COOKIE)
            .ok_or_else(|| AuthRedirect("/student/login").into_response())?;

        let claims = verify_student_token(&token, &resources.config.session_secret)
            .map_err(|_| AuthRedirect("/student/login").into_response())?;

        Ok(StudentAuth(claims))
    }
}

/// Extractor for the admin gate. Rejects by redirecting to the password
/// login page.
pub struct AdminAuth;

impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let resources = parts
            .extensions
            .get::<AppResources>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("AppResources not found in extensions");
                ApiError::server_error().into_response()
            })?;

        let token = cookie_value(&parts.headers, ADMIN_COOKIE)
            .ok_or_else(|| AuthRedirect("/login").into_response())?;

        verify_admin_token(&token, &resources.config.session_secret)
            .map_err(|_| AuthRedirect("/login").into_response())?;

        Ok(AdminAuth)
    }
}
