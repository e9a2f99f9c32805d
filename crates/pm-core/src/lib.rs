//! # pm-core
//!
//! Core types, traits, and configuration for Property Manager RS.
//!
//! This crate provides the building blocks shared by every other crate:
//! - Common error types
//! - Result type aliases
//! - Identifier types and entity traits
//! - Configuration types

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::*;
pub use result::*;
pub use traits::*;
