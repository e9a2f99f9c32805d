//! API handlers

pub mod dashboard;
pub mod documents;
pub mod maintenance;
pub mod properties;
pub mod tenants;
pub mod upload;
