//! Identifier types and entity traits shared by models and repositories

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Primary key type for all persisted entities
pub type Id = Uuid;

/// Owner identifier as issued by the external identity provider (token `sub`)
pub type UserId = String;

/// Trait for entities that have a primary key
pub trait Identifiable {
    fn id(&self) -> Id;
}

/// Trait for entities with timestamps
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc> {
        self.created_at()
    }
}

/// Base trait for all domain entities
pub trait Entity: Identifiable + Send + Sync {
    /// The database table name
    const TABLE_NAME: &'static str;

    /// Human-readable type name for error messages
    const TYPE_NAME: &'static str;
}

