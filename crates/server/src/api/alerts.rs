//! SOS alert API endpoints.
//!
//! - `POST /api/alert` - Ingest one alert from a student session
//! - `GET /api/get_alerts` - Full alert list for the polling dashboard

use crate::AppResources;
use crate::api::auth::{ApiError, StudentAuth};
use crate::entity::alert;
use crate::store::{AlertStore, DEFAULT_EMERGENCY_TYPE, DEFAULT_SOURCE, NewAlert};
use axum::{Extension, Json, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Tag for OpenAPI documentation.
pub const ALERTS_TAG: &str = "Alerts API";

/// Ingestion payload. Everything is optional; defaults and the session
/// identity fill the gaps. Coordinates are stored raw, unvalidated.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AlertPayload {
    pub lat: Option<f64>,
    pub long: Option<f64>,
    /// Overrides the session email as the submitter identifier when present.
    pub student_id: Option<String>,
    /// Free-form client tag, e.g. "WEB" or "ANDROID".
    pub source: Option<String>,
    /// Free-form category, e.g. "Fire" or "Medical".
    pub emergency_type: Option<String>,
}

/// Wire shape the dashboard consumes. `status` is deliberately not exposed;
/// it only ever holds "Active" in this service.
#[derive(Debug, Serialize, ToSchema)]
pub struct AlertDto {
    pub id: i32,
    pub student_id: String,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub source: String,
    /// Wall-clock time of ingestion, HH:MM:SS, as the dashboard renders it.
    pub timestamp: String,
    pub emergency_type: String,
}

impl From<alert::Model> for AlertDto {
    fn from(model: alert::Model) -> Self {
        Self {
            id: model.id,
            student_id: model.student_id,
            lat: model.lat,
            long: model.long,
            source: model.source,
            timestamp: clock_time(model.created_at),
            emergency_type: model
                .emergency_type
                .unwrap_or_else(|| DEFAULT_EMERGENCY_TYPE.to_string()),
        }
    }
}

fn clock_time(t: OffsetDateTime) -> String {
    let format = time::macros::format_description!("[hour]:[minute]:[second]");
    t.format(&format).unwrap_or_default()
}

/// Creates the alerts API router.
#[tracing::instrument(skip_all)]
pub fn router() -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(receive_alert))
        .routes(routes!(get_alerts))
}

/// Ingest one SOS alert.
#[tracing::instrument(skip(resources, student, payload), fields(student_email = %student.email))]
#[utoipa::path(
    post,
    path = "/alert",
    tag = ALERTS_TAG,
    operation_id = "Receive Alert",
    summary = "Submit an SOS alert",
    description = "Appends one alert record. Requires a student session; a request \
                   without one is redirected to the student login flow.\n\n\
                   `student_id` defaults to the session email, `source` to \"WEB\" and \
                   `emergency_type` to \"Others\" when omitted. Coordinates are stored \
                   as sent, without validation.",
    request_body(content = AlertPayload, description = "Alert details"),
    responses(
        (status = 200, description = "Alert stored", content_type = "application/json", example = json!({"status": "success", "alert_id": 1})),
        (status = 303, description = "No student session; redirect to login"),
        (status = 400, description = "Missing or unparseable JSON body", body = ApiError),
        (status = 500, description = "Storage failure", body = ApiError),
    )
)]
async fn receive_alert(
    Extension(resources): Extension<AppResources>,
    StudentAuth(student): StudentAuth,
    payload: Result<Json<AlertPayload>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(payload) = payload
        .map_err(|rejection| ApiError::bad_request(format!("No JSON data received: {rejection}")))?;

    let student_id = payload
        .student_id
        .unwrap_or_else(|| student.email.clone());
    let emergency_type = payload
        .emergency_type
        .unwrap_or_else(|| DEFAULT_EMERGENCY_TYPE.to_string());

    let new_alert = NewAlert {
        student_id: student_id.clone(),
        lat: payload.lat,
        long: payload.long,
        source: payload.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        emergency_type: emergency_type.clone(),
        created_at: OffsetDateTime::now_utc(),
    };

    let store = AlertStore::new(resources.db.clone());
    let id = store.insert(new_alert).await.map_err(|e| {
        tracing::error!(
            name = "api.receive_alert.db_insert_failed",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            error = ?e,
            message = "Failed to insert alert"
        );
        ApiError::server_error()
    })?;

    tracing::info!(
        alert_id = id,
        student_id = %student_id,
        emergency_type = %emergency_type,
        "SOS alert received"
    );

    Ok(Json(json!({ "status": "success", "alert_id": id })))
}

/// Full alert list, newest first.
#[tracing::instrument(skip(resources))]
#[utoipa::path(
    get,
    path = "/get_alerts",
    tag = ALERTS_TAG,
    operation_id = "Get Alerts",
    summary = "List every stored alert, newest first",
    description = "Returns the complete alert list as one response; the dashboard \
                   re-polls this endpoint on a fixed interval and re-renders the whole \
                   list each time. No pagination or delta fetch exists.\n\n\
                   Rows that predate the `emergency_type` column are reported with \
                   the default \"Others\".",
    responses(
        (status = 200, description = "All alerts, newest first", body = [AlertDto]),
        (status = 500, description = "Storage failure", body = ApiError),
    )
)]
async fn get_alerts(
    Extension(resources): Extension<AppResources>,
) -> Result<Json<Vec<AlertDto>>, ApiError> {
    let store = AlertStore::new(resources.db.clone());
    let alerts = store.list_all().await.map_err(|e| {
        tracing::error!(
            name = "api.get_alerts.db_query_failed",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            error = ?e,
            message = "Failed to list alerts"
        );
        ApiError::server_error()
    })?;

    Ok(Json(alerts.into_iter().map(AlertDto::from).collect()))
}
