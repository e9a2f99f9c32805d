//! Base contract system

use pm_core::error::ValidationErrors;
use validator::Validate;

/// Result of contract validation
pub type ValidationResult = Result<(), ValidationErrors>;

/// Base contract trait
pub trait Contract<T>: Send + Sync {
    /// Validate the entity
    fn validate(&self, entity: &T) -> ValidationResult;
}

/// Run the `validator` derive rules of a payload, collecting into `errors`
pub fn check_attributes<T: Validate>(payload: &T, errors: &mut ValidationErrors) {
    if let Err(e) = payload.validate() {
        errors.merge(e.into());
    }
}

/// Reject values that are empty once surrounding whitespace is removed
pub fn validate_present(field: &str, value: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() && !errors.has_error(field) {
        errors.add(field, "can't be blank");
    }
}
