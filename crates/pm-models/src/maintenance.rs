//! Maintenance request model
//!
//! Table: maintenance_requests

use chrono::{DateTime, Utc};
use pm_core::traits::{Entity, Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenancePriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl MaintenancePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            "URGENT" => Some(Self::Urgent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceCategory {
    Plumbing,
    Electrical,
    Hvac,
    Appliance,
    Structural,
    #[default]
    Other,
}

impl MaintenanceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plumbing => "PLUMBING",
            Self::Electrical => "ELECTRICAL",
            Self::Hvac => "HVAC",
            Self::Appliance => "APPLIANCE",
            Self::Structural => "STRUCTURAL",
            Self::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PLUMBING" => Some(Self::Plumbing),
            "ELECTRICAL" => Some(Self::Electrical),
            "HVAC" => Some(Self::Hvac),
            "APPLIANCE" => Some(Self::Appliance),
            "STRUCTURAL" => Some(Self::Structural),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceStatus {
    #[default]
    Open,
    InProgress,
    Completed,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(Self::Open),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Anything not yet completed counts as active
    pub fn is_active(&self) -> bool {
        *self != Self::Completed
    }
}

/// Maintenance request entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequest {
    pub id: Id,
    pub property_id: Id,
    pub tenant_id: Id,
    pub title: String,
    pub description: String,
    pub priority: MaintenancePriority,
    pub category: MaintenanceCategory,
    pub status: MaintenanceStatus,
    pub assigned_to: Option<String>,
    pub cost: Option<f64>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl MaintenanceRequest {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Move to `status`, keeping `completed_at` in step with it
    pub fn transition_to(&mut self, status: MaintenanceStatus, now: DateTime<Utc>) {
        match (self.status, status) {
            (from, MaintenanceStatus::Completed) if from != MaintenanceStatus::Completed => {
                self.completed_at = Some(now);
            }
            (_, to) if to != MaintenanceStatus::Completed => {
                self.completed_at = None;
            }
            _ => {}
        }
        self.status = status;
    }
}

impl Identifiable for MaintenanceRequest {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for MaintenanceRequest {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for MaintenanceRequest {
    const TABLE_NAME: &'static str = "maintenance_requests";
    const TYPE_NAME: &'static str = "MaintenanceRequest";
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceRequestDto {
    pub property_id: Id,
    pub tenant_id: Id,

    #[validate(length(min = 1, max = 255, message = "can't be blank"))]
    pub title: String,

    #[validate(length(min = 1, message = "can't be blank"))]
    pub description: String,

    #[serde(default)]
    pub priority: MaintenancePriority,
    #[serde(default)]
    pub category: MaintenanceCategory,
    #[serde(default)]
    pub status: MaintenanceStatus,

    pub assigned_to: Option<String>,

    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub cost: Option<f64>,

    #[serde(default)]
    pub images: Vec<String>,
}

/// DTO for updating a maintenance request
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenanceRequestDto {
    pub status: Option<MaintenanceStatus>,
    pub assigned_to: Option<String>,
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub cost: Option<f64>,
}

impl UpdateMaintenanceRequestDto {
    pub fn apply_to(&self, request: &mut MaintenanceRequest, now: DateTime<Utc>) {
        if let Some(status) = self.status {
            request.transition_to(status, now);
        }
        if let Some(ref assigned_to) = self.assigned_to {
            request.assigned_to = Some(assigned_to.clone());
        }
        if let Some(cost) = self.cost {
            request.cost = Some(cost);
        }
        request.updated_at = now;
    }
}
