use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Best-effort in-place addition: stores created before this column
        // existed keep their rows, which read back as NULL and are rendered
        // as "Others" by the API layer.
        // Tolerated failure: some backends lack ADD COLUMN IF NOT EXISTS and
        // error when the column is already present.
        let _ = manager
            .alter_table(
                Table::alter()
                    .table(Alerts::Table)
                    .add_column_if_not_exists(string_null(Alerts::EmergencyType))
                    .to_owned(),
            )
            .await;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Alerts::Table)
                    .drop_column(Alerts::EmergencyType)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Alerts {
    Table,
    EmergencyType,
}
