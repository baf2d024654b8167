//! OpenAPI/Utoipa configuration.

use crate::api::{alerts::ALERTS_TAG, health::MISC_TAG, pages::PAGES_TAG};
use utoipa::OpenApi;

/// OpenAPI documentation configuration.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus SOS Intake API",
        version = "1.0.0",
        description = "Intake and retrieval API for campus SOS alerts."
    ),
    tags(
        (name = MISC_TAG, description = "Miscellaneous endpoints"),
        (name = ALERTS_TAG, description = "Alert ingestion and retrieval"),
        (name = PAGES_TAG, description = "Browser views and login flows")
    )
)]
pub struct ApiDoc;
