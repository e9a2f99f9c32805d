//! Tenant model
//!
//! Table: tenants

use chrono::{DateTime, NaiveDate, Utc};
use pm_core::traits::{Entity, Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenantStatus {
    Active,
    #[default]
    Pending,
    Past,
}

impl TenantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Pending => "PENDING",
            Self::Past => "PAST",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Self::Active),
            "PENDING" => Some(Self::Pending),
            "PAST" => Some(Self::Past),
            _ => None,
        }
    }
}

/// Tenant entity
///
/// Occupies exactly one unit for the length of a lease.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Id,
    pub unit_id: Id,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub emergency_contact: Option<String>,
    pub lease_start: NaiveDate,
    pub lease_end: NaiveDate,
    /// Monthly rent
    pub rent_amount: f64,
    pub deposit_amount: f64,
    /// Day of the month rent is due
    pub payment_due: i32,
    pub status: TenantStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.status == TenantStatus::Active
    }
}

impl Identifiable for Tenant {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for Tenant {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Tenant {
    const TABLE_NAME: &'static str = "tenants";
    const TYPE_NAME: &'static str = "Tenant";
}

/// DTO for assigning a tenant to a unit
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantDto {
    pub unit_id: Id,

    #[validate(length(min = 1, max = 100, message = "can't be blank"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "can't be blank"))]
    pub last_name: String,

    #[validate(email(message = "is not a valid email"))]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    pub emergency_contact: Option<String>,

    pub lease_start: NaiveDate,
    pub lease_end: NaiveDate,

    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub rent_amount: f64,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub deposit_amount: f64,

    #[serde(default = "default_payment_due")]
    #[validate(range(min = 1, max = 31, message = "must be a day of the month"))]
    pub payment_due: i32,

    #[serde(default)]
    pub status: TenantStatus,
}

fn default_payment_due() -> i32 {
    1
}

/// DTO for updating a tenant
///
/// Moving a tenant to another unit is not supported; remove and re-create.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantDto {
    #[validate(length(min = 1, max = 100, message = "can't be blank"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "can't be blank"))]
    pub last_name: Option<String>,
    #[validate(email(message = "is not a valid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub lease_start: Option<NaiveDate>,
    pub lease_end: Option<NaiveDate>,
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub rent_amount: Option<f64>,
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub deposit_amount: Option<f64>,
    #[validate(range(min = 1, max = 31, message = "must be a day of the month"))]
    pub payment_due: Option<i32>,
    pub status: Option<TenantStatus>,
}

impl UpdateTenantDto {
    pub fn apply_to(&self, tenant: &mut Tenant) {
        if let Some(ref v) = self.first_name {
            tenant.first_name = v.clone();
        }
        if let Some(ref v) = self.last_name {
            tenant.last_name = v.clone();
        }
        if let Some(ref v) = self.email {
            tenant.email = v.clone();
        }
        if let Some(ref v) = self.phone {
            tenant.phone = v.clone();
        }
        if let Some(ref v) = self.emergency_contact {
            tenant.emergency_contact = Some(v.clone());
        }
        if let Some(v) = self.lease_start {
            tenant.lease_start = v;
        }
        if let Some(v) = self.lease_end {
            tenant.lease_end = v;
        }
        if let Some(v) = self.rent_amount {
            tenant.rent_amount = v;
        }
        if let Some(v) = self.deposit_amount {
            tenant.deposit_amount = v;
        }
        if let Some(v) = self.payment_due {
            tenant.payment_due = v;
        }
        if let Some(v) = self.status {
            tenant.status = v;
        }
    }
}
