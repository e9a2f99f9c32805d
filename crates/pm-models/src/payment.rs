//! Payment model
//!
//! Table: payments

use chrono::{DateTime, Utc};
use pm_core::traits::{Entity, Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    #[default]
    Paid,
    Late,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Late => "LATE",
            Self::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "PAID" => Some(Self::Paid),
            "LATE" => Some(Self::Late),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Id,
    pub tenant_id: Id,
    pub amount: f64,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl Identifiable for Payment {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for Payment {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Payment {
    const TABLE_NAME: &'static str = "payments";
    const TYPE_NAME: &'static str = "Payment";
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentDto {
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub amount: f64,
    #[serde(default)]
    pub status: PaymentStatus,
}
