//! Domain layer - business logic and services

pub mod events;
pub mod profile;
pub mod rbac;
pub mod release_status;
pub mod repository;
pub mod service;
pub mod splits;
pub mod subscriptions;
pub mod wallet;
pub mod webhook;

pub use events::{AuditLogPublisher, DistributionEvent, EventPublisher};
pub use repository::{
    ArtistRequestRepository, AuditFilter, AuditRepository, ChangeRequestRepository,
    FinanceRepository, ReleaseRepository, RolePermissionRepository, SplitRepository,
    UserRepository,
};
pub use service::{Repositories, Service, ServiceSettings};
pub use wallet::{BalancePolicy, LedgerPosting, WalletLimits};
