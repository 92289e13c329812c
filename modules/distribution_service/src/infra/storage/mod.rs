//! Storage layer - database entities and repositories

pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod repositories;

pub use migrations::Migrator;
pub use repositories::{
    SeaOrmArtistRequestRepository, SeaOrmAuditRepository, SeaOrmChangeRequestRepository,
    SeaOrmFinanceRepository, SeaOrmReleaseRepository, SeaOrmRolePermissionRepository,
    SeaOrmSplitRepository, SeaOrmUserRepository,
};

use crate::domain::Repositories;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Build every SeaORM repository on one shared connection
pub fn repositories(db: Arc<DatabaseConnection>) -> Repositories {
    Repositories {
        users: Arc::new(SeaOrmUserRepository::new(db.clone())),
        permissions: Arc::new(SeaOrmRolePermissionRepository::new(db.clone())),
        releases: Arc::new(SeaOrmReleaseRepository::new(db.clone())),
        change_requests: Arc::new(SeaOrmChangeRequestRepository::new(db.clone())),
        artist_requests: Arc::new(SeaOrmArtistRequestRepository::new(db.clone())),
        splits: Arc::new(SeaOrmSplitRepository::new(db.clone())),
        finance: Arc::new(SeaOrmFinanceRepository::new(db.clone())),
        audit: Arc::new(SeaOrmAuditRepository::new(db)),
    }
}
