//! Contract tests for the alert store.

use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use sos_intake::store::{AlertStore, DEFAULT_SOURCE, NewAlert, STATUS_ACTIVE};
use std::sync::Arc;
use time::OffsetDateTime;

async fn test_store() -> AlertStore {
    let db = Database::connect("sqlite::memory:").await.expect("connect");
    Migrator::up(&db, None).await.expect("run migrations");
    AlertStore::new(Arc::new(db))
}

fn alert_from(student_id: &str, emergency_type: &str) -> NewAlert {
    NewAlert {
        student_id: student_id.to_string(),
        lat: Some(28.6),
        long: Some(77.2),
        source: DEFAULT_SOURCE.to_string(),
        emergency_type: emergency_type.to_string(),
        created_at: OffsetDateTime::now_utc(),
    }
}

#[tokio::test]
async fn insert_returns_strictly_increasing_ids() {
    let store = test_store().await;
    let mut last = 0;
    for i in 0..5 {
        let id = store
            .insert(alert_from(&format!("student{i}@nitdelhi.ac.in"), "Fire"))
            .await
            .expect("insert");
        assert!(id > last);
        last = id;
    }
}

#[tokio::test]
async fn list_all_returns_every_row_newest_first() {
    let store = test_store().await;
    for kind in ["Fire", "Medical", "Others"] {
        store
            .insert(alert_from("student@nitdelhi.ac.in", kind))
            .await
            .expect("insert");
    }

    let alerts = store.list_all().await.expect("list");
    assert_eq!(alerts.len(), 3);
    assert!(alerts.windows(2).all(|w| w[0].id > w[1].id));
    assert_eq!(alerts[0].emergency_type.as_deref(), Some("Others"));
}

#[tokio::test]
async fn inserted_rows_are_always_active() {
    let store = test_store().await;
    store
        .insert(alert_from("student@nitdelhi.ac.in", "Fire"))
        .await
        .expect("insert");

    let alerts = store.list_all().await.expect("list");
    assert_eq!(alerts[0].status, STATUS_ACTIVE);
}

#[tokio::test]
async fn duplicate_submissions_are_stored_as_separate_rows() {
    let store = test_store().await;
    let first = store
        .insert(alert_from("student@nitdelhi.ac.in", "Fire"))
        .await
        .expect("insert");
    let second = store
        .insert(alert_from("student@nitdelhi.ac.in", "Fire"))
        .await
        .expect("insert");
    assert_ne!(first, second);
    assert_eq!(store.list_all().await.expect("list").len(), 2);
}
