//! PostgreSQL-backed dashboard source

use async_trait::async_trait;
use pm_models::{MaintenanceWithContext, PaymentWithTenant, PropertySnapshot};
use pm_stats::{DashboardSource, DataFetchFailure};
use sqlx::PgPool;

use crate::maintenance::{MaintenanceFilter, MaintenanceRepository};
use crate::payments::PaymentRepository;
use crate::properties::PropertyRepository;
use crate::repository::RepositoryError;

#[derive(Clone)]
pub struct PgDashboardSource {
    properties: PropertyRepository,
    maintenance: MaintenanceRepository,
    payments: PaymentRepository,
}

impl PgDashboardSource {
    pub fn new(pool: PgPool) -> Self {
        Self {
            properties: PropertyRepository::new(pool.clone()),
            maintenance: MaintenanceRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool),
        }
    }
}

fn failure(what: &'static str) -> impl FnOnce(RepositoryError) -> DataFetchFailure {
    move |err| DataFetchFailure::new(what, err.to_string())
}

#[async_trait]
impl DashboardSource for PgDashboardSource {
    async fn list_properties_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<PropertySnapshot>, DataFetchFailure> {
        self.properties
            .snapshots(user_id)
            .await
            .map_err(failure("properties"))
    }

    async fn list_recent_maintenance_requests(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<MaintenanceWithContext>, DataFetchFailure> {
        self.maintenance
            .list(user_id, MaintenanceFilter::default(), Some(limit))
            .await
            .map_err(failure("maintenance requests"))
    }

    async fn list_recent_payments(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<PaymentWithTenant>, DataFetchFailure> {
        self.payments
            .recent(user_id, limit)
            .await
            .map_err(failure("payments"))
    }
}
