//! Document model
//!
//! Table: documents

use chrono::{DateTime, Utc};
use pm_core::traits::{Entity, Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Lease,
    Application,
    Agreement,
    Id,
    Insurance,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lease => "LEASE",
            Self::Application => "APPLICATION",
            Self::Agreement => "AGREEMENT",
            Self::Id => "ID",
            Self::Insurance => "INSURANCE",
            Self::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LEASE" => Some(Self::Lease),
            "APPLICATION" => Some(Self::Application),
            "AGREEMENT" => Some(Self::Agreement),
            "ID" => Some(Self::Id),
            "INSURANCE" => Some(Self::Insurance),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentCategory {
    Tenant,
    Property,
    Maintenance,
    Financial,
    Other,
}

impl DocumentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tenant => "TENANT",
            Self::Property => "PROPERTY",
            Self::Maintenance => "MAINTENANCE",
            Self::Financial => "FINANCIAL",
            Self::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TENANT" => Some(Self::Tenant),
            "PROPERTY" => Some(Self::Property),
            "MAINTENANCE" => Some(Self::Maintenance),
            "FINANCIAL" => Some(Self::Financial),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Document entity
///
/// Metadata for an uploaded file. The bytes live in the upload store and
/// are addressed by `url`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Id,
    pub property_id: Id,
    pub tenant_id: Option<Id>,
    pub name: String,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub category: DocumentCategory,
    pub url: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identifiable for Document {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for Document {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Document {
    const TABLE_NAME: &'static str = "documents";
    const TYPE_NAME: &'static str = "Document";
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentDto {
    #[validate(length(min = 1, max = 255, message = "can't be blank"))]
    pub name: String,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub category: DocumentCategory,
    #[validate(length(min = 1, message = "can't be blank"))]
    pub url: String,
    pub property_id: Id,
    pub tenant_id: Option<Id>,
    #[serde(default)]
    #[validate(range(min = 0, message = "must be greater than or equal to 0"))]
    pub file_size: i64,
}

impl CreateDocumentDto {
    /// MIME type guessed from the extension of the stored file's URL
    pub fn mime_type(&self) -> String {
        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}
