use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alerts::Table)
                    .if_not_exists()
                    .col(pk_auto(Alerts::Id))
                    .col(string(Alerts::StudentId).not_null().to_owned())
                    .col(double_null(Alerts::Lat))
                    .col(double_null(Alerts::Long))
                    .col(
                        string(Alerts::Source)
                            .default("WEB")
                            .not_null()
                            .to_owned(),
                    )
                    .col(
                        timestamp_with_time_zone(Alerts::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null()
                            .to_owned(),
                    )
                    .col(
                        string(Alerts::Status)
                            .default("Active")
                            .not_null()
                            .to_owned(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alerts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Alerts {
    Table,
    Id,
    StudentId,
    Lat,
    Long,
    Source,
    CreatedAt,
    Status,
}
