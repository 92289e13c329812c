//! Module declaration and lifecycle implementation

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::DistributionApi;
use crate::domain::{AuditLogPublisher, Service};
use crate::infra::auth::JwtVerifier;
use anyhow::Result;
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

/// Distribution service module
///
/// Lifecycle: `migrate` once, `init` with a connection, then mount
/// `register_rest` on the host router and run `serve` until cancelled.
pub struct DistributionServiceModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
}

impl Default for DistributionServiceModule {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl DistributionServiceModule {
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            service: RwLock::new(None),
        }
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Build repositories and the domain service
    pub async fn init(&self, db: Arc<DatabaseConnection>) -> Result<()> {
        let cfg = self.config();
        cfg.validate()?;

        let repos = crate::infra::storage::repositories(db);
        let event_publisher = Arc::new(AuditLogPublisher::new(repos.audit.clone()));

        let service = Arc::new(Service::new(repos, event_publisher, cfg.service_settings()));
        *self.service.write() = Some(service.clone());

        if cfg.seed_default_permissions {
            service
                .seed_default_permissions()
                .await
                .map_err(|e| anyhow::anyhow!("seeding role permissions failed: {e}"))?;
        }

        tracing::info!(company_id = %cfg.company_id, "Distribution service initialized");
        Ok(())
    }

    /// Run schema migrations
    pub async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("Distribution service migrations completed");
        Ok(())
    }

    pub fn service(&self) -> Result<Arc<Service>> {
        self.service
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client for other modules
    pub fn client(&self) -> Result<Arc<dyn DistributionApi>> {
        Ok(Arc::new(NativeClient::new(self.service()?)))
    }

    /// Mount the REST routes on `router`
    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let service = self.service()?;
        let cfg = self.config();
        let verifier = Arc::new(JwtVerifier::new(&cfg.jwt_secret, cfg.jwt_issuer.as_deref()));

        tracing::info!("Registering distribution service REST routes");
        let router =
            crate::api::rest::register_routes(router, service, verifier, cfg.rest_settings())?;
        Ok(router.layer(TraceLayer::new_for_http()))
    }

    /// Background entry point: runs subscription renewals on an interval
    /// until `cancel` fires
    pub async fn serve(self: Arc<Self>, cancel: CancellationToken) -> Result<()> {
        let cfg = self.config();
        if !cfg.renewals_enabled {
            cancel.cancelled().await;
            return Ok(());
        }

        let service = self.service()?;
        let mut ticker = tokio::time::interval(cfg.renewal_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;

        tracing::info!(interval = ?cfg.renewal_interval, "subscription renewal task started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    match service.process_renewals(chrono::Utc::now()).await {
                        Ok(report) => tracing::info!(
                            processed = report.processed,
                            successful = report.successful,
                            insufficient_funds = report.insufficient_funds,
                            failed = report.failed,
                            "renewal run finished"
                        ),
                        Err(e) => tracing::error!(error = %e, "renewal run failed"),
                    }
                }
            }
        }

        tracing::info!("subscription renewal task stopped");
        Ok(())
    }
}
