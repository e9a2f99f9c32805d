//! Pre-joined views of the entity graph
//!
//! These are what the persistence layer hands to the aggregations: a
//! property with its units (each carrying its current tenant, if any), its
//! maintenance requests and documents, plus the flattened activity records.

use serde::{Deserialize, Serialize};

use crate::{Document, MaintenanceRequest, Payment, Property, Tenant, Unit};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnitSnapshot {
    #[serde(flatten)]
    pub unit: Unit,
    pub tenant: Option<Tenant>,
}

impl UnitSnapshot {
    pub fn is_occupied(&self) -> bool {
        self.tenant.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertySnapshot {
    #[serde(flatten)]
    pub property: Property,
    pub units: Vec<UnitSnapshot>,
    pub maintenance_requests: Vec<MaintenanceRequest>,
    pub documents: Vec<Document>,
}

impl PropertySnapshot {
    pub fn new(property: Property) -> Self {
        Self {
            property,
            units: Vec::new(),
            maintenance_requests: Vec::new(),
            documents: Vec::new(),
        }
    }
}

/// Maintenance request with the names shown in the activity feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWithContext {
    #[serde(flatten)]
    pub request: MaintenanceRequest,
    pub tenant_name: String,
    pub property_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWithTenant {
    #[serde(flatten)]
    pub payment: Payment,
    pub tenant_name: String,
}

/// Tenant listing row: the tenant plus where they live
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TenantWithUnit {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub unit_number: String,
    pub property_id: crate::Id,
    pub property_name: String,
}
