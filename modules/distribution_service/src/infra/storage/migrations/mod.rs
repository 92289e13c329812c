//! Database migrations for the distribution service

use sea_orm_migration::prelude::*;

mod m20250301_000001_create_identity;
mod m20250301_000002_create_releases;
mod m20250301_000003_create_finance;
mod m20250301_000004_create_webhook_logs;
mod m20250301_000005_create_processed_webhooks;
mod m20250301_000006_create_artist_requests;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_identity::Migration),
            Box::new(m20250301_000002_create_releases::Migration),
            Box::new(m20250301_000003_create_finance::Migration),
            Box::new(m20250301_000004_create_webhook_logs::Migration),
            Box::new(m20250301_000005_create_processed_webhooks::Migration),
            Box::new(m20250301_000006_create_artist_requests::Migration),
        ]
    }
}

fn timestamp_now<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}
