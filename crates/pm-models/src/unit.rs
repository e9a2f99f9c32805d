//! Unit model
//!
//! Table: units

use chrono::{DateTime, Utc};
use pm_core::traits::{Entity, Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Persisted unit status
///
/// Written by the tenant repository when a tenant is assigned or removed.
/// Aggregations read tenant presence instead of this column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitStatus {
    Occupied,
    #[default]
    Vacant,
}

impl UnitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Occupied => "OCCUPIED",
            Self::Vacant => "VACANT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OCCUPIED" => Some(Self::Occupied),
            "VACANT" => Some(Self::Vacant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: Id,
    pub property_id: Id,
    pub unit_number: String,
    pub status: UnitStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identifiable for Unit {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for Unit {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Unit {
    const TABLE_NAME: &'static str = "units";
    const TYPE_NAME: &'static str = "Unit";
}

#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnitDto {
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "can't be blank"))]
    pub unit_number: String,
}
