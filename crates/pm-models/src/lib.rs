//! # pm-models
//!
//! Domain models for Property Manager RS.
//!
//! Entity structs mirror the relational schema (properties, units, tenants,
//! maintenance requests, payments, documents). Each entity implements the
//! core traits from `pm-core`. The `snapshot` module holds the pre-joined
//! graph records the dashboard aggregations read.

pub use pm_core::traits::{Entity, Id, Identifiable, Timestamped, UserId};

pub mod document;
pub mod maintenance;
pub mod payment;
pub mod property;
pub mod snapshot;
pub mod tenant;
pub mod unit;

pub use document::{CreateDocumentDto, Document, DocumentCategory, DocumentType};
pub use maintenance::{
    CreateMaintenanceRequestDto, MaintenanceCategory, MaintenancePriority, MaintenanceRequest,
    MaintenanceStatus, UpdateMaintenanceRequestDto,
};
pub use payment::{CreatePaymentDto, Payment, PaymentStatus};
pub use property::{CreatePropertyDto, Property, PropertyStatus, PropertyType, UpdatePropertyDto};
pub use snapshot::{
    MaintenanceWithContext, PaymentWithTenant, PropertySnapshot, TenantWithUnit, UnitSnapshot,
};
pub use tenant::{CreateTenantDto, Tenant, TenantStatus, UpdateTenantDto};
pub use unit::{CreateUnitDto, Unit, UnitStatus};
