//! # pm-db
//!
//! Database layer for Property Manager RS.
//!
//! This crate provides PostgreSQL access using SQLx:
//!
//! - Connection pool management
//! - Owner-scoped repositories: every query joins back to
//!   `properties.user_id`, so a row owned by someone else is simply not found
//! - [`PgDashboardSource`], the database-backed `DashboardSource`
//!
//! The expected schema is in `schema.sql` next to this crate.
//!
//! ## Example
//!
//! ```ignore
//! use pm_db::{Database, DatabaseConfig, PropertyRepository};
//!
//! let db = Database::connect(&DatabaseConfig::from_env()).await?;
//! let repo = PropertyRepository::new(db.pool().clone());
//! let mine = repo.list("user_2abc").await?;
//! ```

pub mod dashboard;
pub mod documents;
pub mod maintenance;
pub mod payments;
pub mod pool;
pub mod properties;
pub mod repository;
pub mod tenants;
pub mod units;

pub use dashboard::PgDashboardSource;
pub use documents::DocumentRepository;
pub use maintenance::{MaintenanceFilter, MaintenanceRepository};
pub use payments::PaymentRepository;
pub use pool::{Database, DatabaseConfig, PoolStats};
pub use properties::PropertyRepository;
pub use repository::{RepositoryError, RepositoryResult};
pub use tenants::TenantRepository;
pub use units::UnitRepository;
