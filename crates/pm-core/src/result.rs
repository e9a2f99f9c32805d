//! Result type aliases

use crate::error::PmError;
use crate::traits::Entity;

/// Standard Result type for property management operations
pub type PmResult<T> = Result<T, PmError>;

/// Turn a missing lookup into a typed `NotFound`
pub trait OrNotFound<T> {
    fn or_not_found<E: Entity>(self, id: impl std::fmt::Display) -> PmResult<T>;
}

impl<T> OrNotFound<T> for Option<T> {
    fn or_not_found<E: Entity>(self, id: impl std::fmt::Display) -> PmResult<T> {
        self.ok_or_else(|| PmError::not_found(E::TYPE_NAME, id))
    }
}
