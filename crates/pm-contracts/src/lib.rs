//! # pm-contracts
//!
//! Contract validation for Property Manager RS.
//!
//! Contracts validate write payloads (and entities after an update has been
//! applied) before anything reaches the database. Ownership checks are not
//! contracts; they are part of every repository query.

pub mod base;
pub mod documents;
pub mod maintenance;
pub mod payments;
pub mod properties;
pub mod tenants;
pub mod units;

pub use base::*;
pub use documents::DocumentContract;
pub use maintenance::MaintenanceContract;
pub use payments::PaymentContract;
pub use properties::PropertyContract;
pub use tenants::TenantContract;
pub use units::UnitContract;
