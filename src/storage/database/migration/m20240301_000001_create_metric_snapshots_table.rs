use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MetricSnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MetricSnapshots::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MetricSnapshots::TakenAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MetricSnapshots::SchemaVersion)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(MetricSnapshots::Payload).text().not_null())
                    .to_owned(),
            )
            .await?;

        // Range reads and pruning both filter on taken_at
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_metric_snapshots_taken_at")
                    .table(MetricSnapshots::Table)
                    .col(MetricSnapshots::TakenAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MetricSnapshots::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MetricSnapshots {
    Table,
    Id,
    TakenAt,
    SchemaVersion,
    Payload,
}
