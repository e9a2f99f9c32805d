//! # pm-auth
//!
//! Authentication for Property Manager RS.
//!
//! Sign-in happens at an external identity provider. This crate only
//! verifies the bearer tokens it issues (HS256, optional issuer and
//! audience checks) and turns the `sub` claim into a [`CurrentUser`].

pub mod jwt;
pub mod middleware;
pub mod user;

pub use jwt::{extract_bearer_token, Claims, JwtError, JwtService};
pub use middleware::{AuthError, Authenticator};
pub use user::CurrentUser;
