//! Property model
//!
//! Table: properties

use chrono::{DateTime, Utc};
use pm_core::traits::{Entity, Id, Identifiable, Timestamped, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Listing status of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    #[default]
    Available,
    #[serde(alias = "OCCUPIED")]
    Rented,
    Maintenance,
    Offline,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Rented => "RENTED",
            Self::Maintenance => "MAINTENANCE",
            Self::Offline => "OFFLINE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AVAILABLE" => Some(Self::Available),
            "RENTED" | "OCCUPIED" => Some(Self::Rented),
            "MAINTENANCE" => Some(Self::Maintenance),
            "OFFLINE" => Some(Self::Offline),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    #[default]
    SingleFamily,
    MultiFamily,
    Apartment,
    Condo,
    House,
    Townhouse,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleFamily => "SINGLE_FAMILY",
            Self::MultiFamily => "MULTI_FAMILY",
            Self::Apartment => "APARTMENT",
            Self::Condo => "CONDO",
            Self::House => "HOUSE",
            Self::Townhouse => "TOWNHOUSE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SINGLE_FAMILY" => Some(Self::SingleFamily),
            "MULTI_FAMILY" => Some(Self::MultiFamily),
            "APARTMENT" => Some(Self::Apartment),
            "CONDO" => Some(Self::Condo),
            "HOUSE" => Some(Self::House),
            "TOWNHOUSE" => Some(Self::Townhouse),
            _ => None,
        }
    }
}

/// Property entity
///
/// A building or lot registered by a property manager. Every property has
/// exactly one owning user; all other entities are reached through it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Id,
    pub user_id: UserId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub property_type: PropertyType,
    /// Asking rent per month
    pub price: f64,
    pub bedrooms: i32,
    pub bathrooms: f64,
    /// Floor area in square feet
    pub size: f64,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub status: PropertyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identifiable for Property {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for Property {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Property {
    const TABLE_NAME: &'static str = "properties";
    const TYPE_NAME: &'static str = "Property";
}

impl Property {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// DTO for creating a new property
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyDto {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "can't be blank"))]
    pub name: String,

    pub description: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "can't be blank"))]
    pub address: String,

    pub property_type: Option<PropertyType>,

    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub price: Option<f64>,

    #[validate(range(min = 0, message = "must be greater than or equal to 0"))]
    pub bedrooms: Option<i32>,

    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub bathrooms: Option<f64>,

    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub size: Option<f64>,

    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub status: Option<PropertyStatus>,
}

/// DTO for updating a property
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyDto {
    #[validate(length(min = 1, max = 255, message = "can't be blank"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "can't be blank"))]
    pub address: Option<String>,
    pub property_type: Option<PropertyType>,
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "must be greater than or equal to 0"))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub bathrooms: Option<f64>,
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub size: Option<f64>,
    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub status: Option<PropertyStatus>,
}

impl UpdatePropertyDto {
    /// Apply updates to a property
    pub fn apply_to(&self, property: &mut Property) {
        if let Some(ref name) = self.name {
            property.name = name.clone();
        }
        if let Some(ref description) = self.description {
            property.description = description.clone();
        }
        if let Some(ref address) = self.address {
            property.address = address.clone();
        }
        if let Some(property_type) = self.property_type {
            property.property_type = property_type;
        }
        if let Some(price) = self.price {
            property.price = price;
        }
        if let Some(bedrooms) = self.bedrooms {
            property.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = self.bathrooms {
            property.bathrooms = bathrooms;
        }
        if let Some(size) = self.size {
            property.size = size;
        }
        if let Some(ref features) = self.features {
            property.features = features.clone();
        }
        if let Some(ref images) = self.images {
            property.images = images.clone();
        }
        if let Some(status) = self.status {
            property.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample() -> Property {
        let now = Utc::now();
        Property {
            id: Uuid::new_v4(),
            user_id: "user_1".into(),
            name: "Maple Court".into(),
            description: String::new(),
            address: "12 Maple St".into(),
            property_type: PropertyType::MultiFamily,
            price: 1500.0,
            bedrooms: 2,
            bathrooms: 1.0,
            size: 900.0,
            features: vec![],
            images: vec![],
            status: PropertyStatus::Available,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_accepts_occupied_alias() {
        let status: PropertyStatus = serde_json::from_str("\"OCCUPIED\"").unwrap();
        assert_eq!(status, PropertyStatus::Rented);
        assert_eq!(PropertyStatus::parse("OCCUPIED"), Some(PropertyStatus::Rented));
        assert_eq!(PropertyStatus::parse("nope"), None);
    }

    #[test]
    fn test_update_apply_only_touches_given_fields() {
        let mut property = sample();
        let dto = UpdatePropertyDto {
            name: Some("Maple Court East".into()),
            status: Some(PropertyStatus::Maintenance),
            ..Default::default()
        };
        dto.apply_to(&mut property);

        assert_eq!(property.name, "Maple Court East");
        assert_eq!(property.status, PropertyStatus::Maintenance);
        assert_eq!(property.address, "12 Maple St");
        assert_eq!(property.price, 1500.0);
    }

    #[test]
    fn test_create_dto_missing_name_is_invalid() {
        let dto: CreatePropertyDto =
            serde_json::from_str(r#"{"address": "1 Main St"}"#).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_ownership() {
        let property = sample();
        assert!(property.is_owned_by("user_1"));
        assert!(!property.is_owned_by("user_2"));
    }
}
