//! Request authentication

use axum::http::{header, HeaderMap};
use std::sync::Arc;
use thiserror::Error;

use crate::jwt::{extract_bearer_token, JwtError, JwtService};
use crate::user::CurrentUser;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    Required,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Token expired")]
    TokenExpired,
}

/// Resolves the caller of a request from its headers
#[derive(Clone)]
pub struct Authenticator {
    jwt: Arc<JwtService>,
}

impl Authenticator {
    pub fn new(jwt: JwtService) -> Self {
        Self { jwt: Arc::new(jwt) }
    }

    /// Authenticate from the `Authorization: Bearer` header
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<CurrentUser, AuthError> {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::Required)?;
        let token = extract_bearer_token(authorization).ok_or(AuthError::Required)?;

        match self.jwt.validate_token(token) {
            Ok(claims) => {
                let mut user = CurrentUser::new(claims.sub);
                user.email = claims.email;
                user.name = claims.name;
                Ok(user)
            }
            Err(JwtError::Expired) => Err(AuthError::TokenExpired),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Token signer sharing this authenticator's key
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
