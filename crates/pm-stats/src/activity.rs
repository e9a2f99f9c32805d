//! Recent activity feed
//!
//! Maintenance requests and payments are mapped onto one entry shape,
//! merged and ordered newest first.

use chrono::{DateTime, Utc};
use pm_core::traits::Id;
use pm_models::{MaintenanceWithContext, PaymentWithTenant};
use serde::Serialize;

/// Maximum number of entries in a feed
pub const FEED_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    Maintenance,
    Payment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: Id,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

impl From<&MaintenanceWithContext> for ActivityEntry {
    fn from(m: &MaintenanceWithContext) -> Self {
        Self {
            id: m.request.id,
            kind: ActivityKind::Maintenance,
            title: m.request.title.clone(),
            description: format!("{} - {}", m.tenant_name, m.property_name),
            timestamp: m.request.created_at,
            status: m.request.status.as_str().to_string(),
        }
    }
}

impl From<&PaymentWithTenant> for ActivityEntry {
    fn from(p: &PaymentWithTenant) -> Self {
        Self {
            id: p.payment.id,
            kind: ActivityKind::Payment,
            title: format!("Rent Payment - ${}", p.payment.amount),
            description: p.tenant_name.clone(),
            timestamp: p.payment.created_at,
            status: p.payment.status.as_str().to_string(),
        }
    }
}

/// Merge into at most [`FEED_LIMIT`] entries, newest first.
///
/// Entries with equal timestamps keep their input order, maintenance
/// before payments.
pub fn build_activity_feed(
    maintenance: &[MaintenanceWithContext],
    payments: &[PaymentWithTenant],
) -> Vec<ActivityEntry> {
    let mut feed: Vec<ActivityEntry> = maintenance
        .iter()
        .map(ActivityEntry::from)
        .chain(payments.iter().map(ActivityEntry::from))
        .collect();

    feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    feed.truncate(FEED_LIMIT);
    feed
}
