//! Campus emergency-alert intake service.
//!
//! Students authenticated through the institutional identity provider submit
//! SOS alerts (location, emergency type); a password-gated dashboard polls
//! the retrieval endpoint and renders active alerts.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::oidc::OidcClient;

pub mod api;
pub mod config;
pub mod entity;
pub mod error;
pub mod oidc;
pub mod session;
pub mod store;

/// Shared handles every request handler can reach through an axum
/// `Extension`.
#[derive(Clone)]
pub struct AppResources {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub oidc: Arc<OidcClient>,
}
