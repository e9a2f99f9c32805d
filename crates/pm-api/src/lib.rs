//! # pm-api
//!
//! JSON API for Property Manager RS.
//!
//! Every route requires a bearer token and every lookup is scoped to the
//! caller: someone else's property, tenant or document answers 404.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use extractors::{AppState, AuthenticatedUser};
pub use routes::{files_router, router};
