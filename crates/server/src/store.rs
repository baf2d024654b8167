//! Alert store: the sole source of truth for SOS alerts.
//!
//! Every operation is a single statement against the `alerts` table. Alerts
//! are append-only in this service; no update or delete path exists.

use crate::entity::alert;
use sea_orm::{ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use std::sync::Arc;
use time::OffsetDateTime;

/// Default source tag when the client does not send one.
pub const DEFAULT_SOURCE: &str = "WEB";
/// Default emergency category when the client does not send one, and the
/// rendering of legacy rows that predate the `emergency_type` column.
pub const DEFAULT_EMERGENCY_TYPE: &str = "Others";
/// The only alert status this service ever writes.
pub const STATUS_ACTIVE: &str = "Active";

/// Fields of an alert the ingestion path has resolved; the store assigns the
/// id.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub student_id: String,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub source: String,
    pub emergency_type: String,
    pub created_at: OffsetDateTime,
}

#[derive(Clone)]
pub struct AlertStore {
    db: Arc<DatabaseConnection>,
}

impl AlertStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append one alert and return its assigned id.
    pub async fn insert(&self, new_alert: NewAlert) -> Result<i32, DbErr> {
        let model = alert::ActiveModel {
            student_id: Set(new_alert.student_id),
            lat: Set(new_alert.lat),
            long: Set(new_alert.long),
            source: Set(new_alert.source),
            created_at: Set(new_alert.created_at),
            status: Set(STATUS_ACTIVE.to_string()),
            emergency_type: Set(Some(new_alert.emergency_type)),
            ..Default::default()
        };
        let res = alert::Entity::insert(model).exec(self.db.as_ref()).await?;
        Ok(res.last_insert_id)
    }

    /// Every stored alert, most recent first.
    pub async fn list_all(&self) -> Result<Vec<alert::Model>, DbErr> {
        alert::Entity::find()
            .order_by_desc(alert::Column::Id)
            .all(self.db.as_ref())
            .await
    }
}
