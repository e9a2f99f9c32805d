//! Core error types for Property Manager RS

use std::collections::BTreeMap;
use thiserror::Error;

/// Core error type for all property management operations
#[derive(Error, Debug)]
pub enum PmError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PmError {
    pub fn not_found(entity: &'static str, value: impl std::fmt::Display) -> Self {
        PmError::NotFound {
            entity,
            field: "id",
            value: value.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PmError::Conflict {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            PmError::NotFound { .. } => 404,
            PmError::Unauthorized { .. } => 401,
            PmError::Forbidden { .. } => 403,
            PmError::Validation(_) => 422,
            PmError::Conflict { .. } => 409,
            PmError::Database(_) | PmError::Storage(_) | PmError::Internal(_) => 500,
            PmError::Config(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PmError::NotFound { .. } => "not_found",
            PmError::Unauthorized { .. } => "unauthorized",
            PmError::Forbidden { .. } => "forbidden",
            PmError::Validation(_) => "validation_failed",
            PmError::Conflict { .. } => "conflict",
            PmError::Database(_) => "database_error",
            PmError::Storage(_) => "storage_error",
            PmError::Config(_) => "configuration_error",
            PmError::Internal(_) => "internal_error",
        }
    }
}

/// Validation errors collection, keyed by field name
#[derive(Error, Debug, Default, Clone, PartialEq)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: BTreeMap<String, Vec<String>>,
    /// Errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    /// Flatten into `"<field> <message>"` strings, base errors first
    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = ValidationErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("is invalid ({})", error.code));
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_messages_order() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "can't be blank");
        errors.add("address", "can't be blank");
        errors.add_base("Property not found");

        assert_eq!(
            errors.full_messages(),
            vec![
                "Property not found".to_string(),
                "address can't be blank".to_string(),
                "name can't be blank".to_string(),
            ]
        );
    }

    #[test]
    fn test_merge() {
        let mut a = ValidationErrors::new();
        a.add("title", "is too short");
        let mut b = ValidationErrors::new();
        b.add("title", "can't be blank");
        b.add_base("oops");

        a.merge(b);
        assert_eq!(a.get("title").map(Vec::len), Some(2));
        assert_eq!(a.base_errors.len(), 1);
        assert!(a.into_result().is_err());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(PmError::not_found("Property", "x").status_code(), 404);
        assert_eq!(PmError::conflict("unit occupied").status_code(), 409);
        assert_eq!(
            PmError::Validation(ValidationErrors::new()).error_code(),
            "validation_failed"
        );
    }
}
