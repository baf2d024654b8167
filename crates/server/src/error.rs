use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OidcError {
    #[error("Network error talking to identity provider: {0}")]
    Network(String),
    #[error("HTTP {status} from identity provider: {context}")]
    Http { status: StatusCode, context: String },
    #[error("Invalid response body from identity provider: {0}")]
    InvalidBody(String),
    #[error("Identity provider returned no email for the user")]
    MissingEmail,
}

impl From<reqwest::Error> for OidcError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => OidcError::Http {
                status: StatusCode::from_u16(status.as_u16())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                context: e.to_string(),
            },
            None => OidcError::Network(e.to_string()),
        }
    }
}
