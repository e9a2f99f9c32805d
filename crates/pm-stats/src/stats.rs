//! Dashboard summary figures
//!
//! Occupancy is decided by tenant presence on a unit. The persisted unit
//! status is kept in step by the tenant repository but is not read here.

use pm_models::{PropertySnapshot, UnitSnapshot};
use serde::Serialize;

/// Portfolio-wide figures for one user
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_properties: u32,
    pub total_units: u32,
    pub occupied_units: u32,
    pub vacant_units: u32,
    /// Whole percent, 0 when there are no units
    pub occupancy_rate: u32,
    pub active_requests: u32,
    pub monthly_revenue: f64,
    /// Linked tenants whose status is ACTIVE
    pub total_tenants: u32,
}

impl StatsSummary {
    /// Add one property's figures; counts saturate like [`count`]
    fn absorb(&mut self, detail: &PropertyStats, active_tenants: u32) {
        self.total_units = self.total_units.saturating_add(detail.total_units);
        self.occupied_units = self.occupied_units.saturating_add(detail.occupied_units);
        self.active_requests = self.active_requests.saturating_add(detail.active_requests);
        self.total_tenants = self.total_tenants.saturating_add(active_tenants);
        self.monthly_revenue += detail.monthly_income;
    }
}

/// Figures for a single property's detail view
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyStats {
    pub total_units: u32,
    pub occupied_units: u32,
    pub vacant_units: u32,
    pub occupancy_rate: u32,
    pub document_count: u32,
    pub monthly_income: f64,
    pub active_requests: u32,
}

/// `round(occupied / total * 100)`, or 0 for an empty portfolio
pub fn occupancy_rate(occupied: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let occupied = occupied.min(total);
    ((f64::from(occupied) / f64::from(total)) * 100.0).round() as u32
}

fn unit_rent(unit: &UnitSnapshot) -> f64 {
    match unit.tenant {
        Some(ref tenant) if tenant.rent_amount.is_finite() => tenant.rent_amount.max(0.0),
        _ => 0.0,
    }
}

fn count<T>(items: impl Iterator<Item = T>) -> u32 {
    u32::try_from(items.count()).unwrap_or(u32::MAX)
}

/// Fold a user's property snapshots into the dashboard summary
pub fn compute_stats(properties: &[PropertySnapshot]) -> StatsSummary {
    let mut summary = StatsSummary {
        total_properties: count(properties.iter()),
        ..StatsSummary::default()
    };

    for property in properties {
        let active_tenants = count(
            property
                .units
                .iter()
                .filter_map(|u| u.tenant.as_ref())
                .filter(|t| t.is_active()),
        );
        summary.absorb(&compute_property_stats(property), active_tenants);
    }

    summary.vacant_units = summary.total_units - summary.occupied_units;
    summary.occupancy_rate = occupancy_rate(summary.occupied_units, summary.total_units);
    summary
}

/// Figures for one property
pub fn compute_property_stats(property: &PropertySnapshot) -> PropertyStats {
    let total_units = count(property.units.iter());
    let occupied_units = count(property.units.iter().filter(|u| u.is_occupied()));

    PropertyStats {
        total_units,
        occupied_units,
        vacant_units: total_units - occupied_units,
        occupancy_rate: occupancy_rate(occupied_units, total_units),
        document_count: count(property.documents.iter()),
        monthly_income: property.units.iter().map(unit_rent).sum(),
        active_requests: count(
            property
                .maintenance_requests
                .iter()
                .filter(|r| r.is_active()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{maintenance, property, tenant, unit};
    use pm_models::{MaintenanceStatus, TenantStatus};

    #[test]
    fn test_empty_portfolio_is_zero() {
        let summary = compute_stats(&[]);
        assert_eq!(summary, StatsSummary::default());
        assert_eq!(summary.occupancy_rate, 0);
    }

    #[test]
    fn test_property_without_units_has_zero_rate() {
        let summary = compute_stats(&[property("Empty Lot", vec![])]);
        assert_eq!(summary.total_properties, 1);
        assert_eq!(summary.total_units, 0);
        assert_eq!(summary.occupancy_rate, 0);
        assert_eq!(summary.monthly_revenue, 0.0);
    }

    #[test]
    fn test_two_properties_scenario() {
        let a = property(
            "A",
            vec![
                unit("1", Some(tenant(1000.0, TenantStatus::Active))),
                unit("2", Some(tenant(1200.0, TenantStatus::Active))),
            ],
        );
        let b = property(
            "B",
            vec![
                unit("1", Some(tenant(800.0, TenantStatus::Pending))),
                unit("2", None),
            ],
        );

        let summary = compute_stats(&[a, b]);
        assert_eq!(summary.total_properties, 2);
        assert_eq!(summary.total_units, 4);
        assert_eq!(summary.occupied_units, 3);
        assert_eq!(summary.vacant_units, 1);
        assert_eq!(summary.occupancy_rate, 75);
        assert_eq!(summary.monthly_revenue, 3000.0);
        assert_eq!(summary.total_tenants, 2);
    }

    #[test]
    fn test_active_requests_skip_completed() {
        let mut p = property("A", vec![]);
        p.maintenance_requests = vec![
            maintenance(MaintenanceStatus::Open),
            maintenance(MaintenanceStatus::InProgress),
            maintenance(MaintenanceStatus::Completed),
        ];
        assert_eq!(compute_stats(&[p]).active_requests, 2);
    }

    #[test]
    fn test_rate_rounds_to_nearest() {
        assert_eq!(occupancy_rate(1, 3), 33);
        assert_eq!(occupancy_rate(2, 3), 67);
        assert_eq!(occupancy_rate(1, 8), 13);
        assert_eq!(occupancy_rate(3, 3), 100);
        assert_eq!(occupancy_rate(0, 0), 0);
    }

    #[test]
    fn test_negative_and_nan_rent_contribute_nothing() {
        let p = property(
            "A",
            vec![
                unit("1", Some(tenant(-500.0, TenantStatus::Active))),
                unit("2", Some(tenant(f64::NAN, TenantStatus::Active))),
                unit("3", Some(tenant(700.0, TenantStatus::Active))),
            ],
        );
        let summary = compute_stats(&[p]);
        assert_eq!(summary.monthly_revenue, 700.0);
        assert_eq!(summary.occupied_units, 3);
    }

    #[test]
    fn test_unit_status_column_is_not_consulted() {
        let mut vacant_by_column = unit("1", Some(tenant(900.0, TenantStatus::Active)));
        vacant_by_column.unit.status = pm_models::UnitStatus::Vacant;
        let mut occupied_by_column = unit("2", None);
        occupied_by_column.unit.status = pm_models::UnitStatus::Occupied;

        let summary = compute_stats(&[property("A", vec![vacant_by_column, occupied_by_column])]);
        assert_eq!(summary.occupied_units, 1);
        assert_eq!(summary.occupancy_rate, 50);
    }

    #[test]
    fn test_compute_stats_is_idempotent() {
        let props = vec![
            property("A", vec![unit("1", Some(tenant(1000.0, TenantStatus::Active)))]),
            property("B", vec![unit("1", None), unit("2", None)]),
        ];
        let before = props.clone();
        let first = compute_stats(&props);
        let second = compute_stats(&props);
        assert_eq!(first, second);
        assert_eq!(props, before);
    }

    #[test]
    fn test_invariants_hold_across_shapes() {
        for occupied in 0..6usize {
            for vacant in 0..6usize {
                let mut units = Vec::new();
                for i in 0..occupied {
                    units.push(unit(&format!("o{i}"), Some(tenant(100.0, TenantStatus::Active))));
                }
                for i in 0..vacant {
                    units.push(unit(&format!("v{i}"), None));
                }
                let s = compute_stats(&[property("P", units)]);
                assert!(s.occupancy_rate <= 100);
                assert!(s.occupied_units <= s.total_units);
                assert!(s.monthly_revenue >= 0.0);
                assert_eq!(s.occupied_units + s.vacant_units, s.total_units);
            }
        }
    }

    #[test]
    fn test_property_stats_detail() {
        let mut p = property(
            "A",
            vec![
                unit("1", Some(tenant(1000.0, TenantStatus::Active))),
                unit("2", None),
            ],
        );
        p.maintenance_requests = vec![maintenance(MaintenanceStatus::Open)];
        p.documents = vec![crate::fixtures::document(p.property.id)];

        let detail = compute_property_stats(&p);
        assert_eq!(detail.total_units, 2);
        assert_eq!(detail.occupied_units, 1);
        assert_eq!(detail.vacant_units, 1);
        assert_eq!(detail.occupancy_rate, 50);
        assert_eq!(detail.document_count, 1);
        assert_eq!(detail.monthly_income, 1000.0);
        assert_eq!(detail.active_requests, 1);
    }

    #[test]
    fn test_counts_saturate_instead_of_overflowing() {
        let mut summary = StatsSummary {
            total_units: u32::MAX - 1,
            occupied_units: u32::MAX - 1,
            active_requests: u32::MAX,
            total_tenants: u32::MAX,
            ..StatsSummary::default()
        };
        let detail = PropertyStats {
            total_units: 2,
            occupied_units: 2,
            active_requests: 1,
            monthly_income: 500.0,
            ..PropertyStats::default()
        };

        summary.absorb(&detail, 1);
        assert_eq!(summary.total_units, u32::MAX);
        assert_eq!(summary.occupied_units, u32::MAX);
        assert_eq!(summary.active_requests, u32::MAX);
        assert_eq!(summary.total_tenants, u32::MAX);
        assert_eq!(summary.monthly_revenue, 500.0);
        assert!(summary.occupied_units <= summary.total_units);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let json = serde_json::to_value(compute_stats(&[])).unwrap();
        assert_eq!(json["occupancyRate"], 0);
        assert_eq!(json["monthlyRevenue"], 0.0);
        assert!(json.get("activeRequests").is_some());
    }
}
