//! Dashboard loading
//!
//! The dashboard must render even when the database misbehaves, so every
//! fetch failure is logged and replaced by the zero summary or an empty
//! feed.

use async_trait::async_trait;
use pm_models::{MaintenanceWithContext, PaymentWithTenant, PropertySnapshot};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::activity::{build_activity_feed, ActivityEntry};
use crate::stats::{compute_stats, StatsSummary};

/// How many of the newest maintenance requests and payments are fetched
pub const RECENT_LIMIT: i64 = 5;

/// The persistence collaborator could not answer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to fetch {what}: {reason}")]
pub struct DataFetchFailure {
    pub what: &'static str,
    pub reason: String,
}

impl DataFetchFailure {
    pub fn new(what: &'static str, reason: impl Into<String>) -> Self {
        Self {
            what,
            reason: reason.into(),
        }
    }
}

/// Read API the dashboard is built from
#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// Every property owned by `user_id`, with units, tenants,
    /// maintenance requests and documents loaded
    async fn list_properties_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<PropertySnapshot>, DataFetchFailure>;

    async fn list_recent_maintenance_requests(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<MaintenanceWithContext>, DataFetchFailure>;

    async fn list_recent_payments(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<PaymentWithTenant>, DataFetchFailure>;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub stats: StatsSummary,
    pub recent_activity: Vec<ActivityEntry>,
    pub properties: Vec<PropertySnapshot>,
}

impl DashboardView {
    /// True when the user has not registered any property yet
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

pub fn stats_or_default(
    properties: Result<Vec<PropertySnapshot>, DataFetchFailure>,
) -> (Vec<PropertySnapshot>, StatsSummary) {
    match properties {
        Ok(properties) => {
            let stats = compute_stats(&properties);
            (properties, stats)
        }
        Err(e) => {
            error!(error = %e, "Dashboard stats unavailable");
            (Vec::new(), StatsSummary::default())
        }
    }
}

/// Feed from both lists, or nothing if either fetch failed
pub fn feed_or_empty(
    maintenance: Result<Vec<MaintenanceWithContext>, DataFetchFailure>,
    payments: Result<Vec<PaymentWithTenant>, DataFetchFailure>,
) -> Vec<ActivityEntry> {
    match (maintenance, payments) {
        (Ok(maintenance), Ok(payments)) => build_activity_feed(&maintenance, &payments),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "Recent activity unavailable");
            Vec::new()
        }
    }
}

/// Fetch everything the dashboard shows for `user_id`, concurrently
#[instrument(skip(source))]
pub async fn load_dashboard<S>(source: &S, user_id: &str) -> DashboardView
where
    S: DashboardSource + ?Sized,
{
    let (properties, maintenance, payments) = futures::join!(
        source.list_properties_for_user(user_id),
        source.list_recent_maintenance_requests(user_id, RECENT_LIMIT),
        source.list_recent_payments(user_id, RECENT_LIMIT),
    );

    let (properties, stats) = stats_or_default(properties);
    let recent_activity = feed_or_empty(maintenance, payments);

    debug!(
        properties = properties.len(),
        activity = recent_activity.len(),
        "Dashboard loaded"
    );

    DashboardView {
        stats,
        recent_activity,
        properties,
    }
}
