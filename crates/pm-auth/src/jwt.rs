//! JWT verification

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pm_core::config::AuthConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims read from provider tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject: the provider's user id
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Written when issuing; provider tokens may carry a list here, so it is
    /// checked by the validator and never decoded
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Token is expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),
}

/// Verifies (and, for tests and local tooling, issues) HS256 tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: Option<String>,
    audience: Option<String>,
}

impl JwtService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: None,
            audience: None,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        let mut service = Self::new(config.jwt_secret.as_bytes());
        service.issuer = config.issuer.clone();
        service.audience = config.audience.clone();
        service
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Sign a token for `user_id` that expires after `expires_in_seconds`
    pub fn create_token(
        &self,
        user_id: &str,
        email: Option<String>,
        expires_in_seconds: i64,
    ) -> Result<String, JwtError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + expires_in_seconds,
            iat: now,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: Some(uuid::Uuid::new_v4().to_string()),
            email,
            name: None,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Check signature, expiry, issuer and audience; return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = self.audience.is_some();

        if let Some(ref issuer) = self.issuer {
            validation.set_issuer(&[issuer]);
        }
        if let Some(ref audience) = self.audience {
            validation.set_audience(&[audience]);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            }
        })?;

        if data.claims.sub.trim().is_empty() {
            return Err(JwtError::Invalid("Token has no subject".to_string()));
        }
        Ok(data.claims)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` value
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    let (scheme, token) = authorization.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";

    #[test]
    fn test_create_and_validate_token() {
        let service = JwtService::new(SECRET);
        let token = service
            .create_token("user_2abc", Some("pm@example.com".into()), 3600)
            .unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user_2abc");
        assert_eq!(claims.email.as_deref(), Some("pm@example.com"));
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::new(SECRET);
        // Past the default 60s leeway
        let token = service.create_token("user_1", None, -3600).unwrap();
        assert_eq!(service.validate_token(&token), Err(JwtError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = JwtService::new(SECRET).create_token("user_1", None, 60).unwrap();
        let other = JwtService::new(b"another-secret-another-secret-xx");
        assert!(matches!(other.validate_token(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_issuer_and_audience_are_enforced() {
        let issuer = JwtService::new(SECRET)
            .with_issuer("https://auth.example.com")
            .with_audience("ppty");
        let token = issuer.create_token("user_1", None, 60).unwrap();
        assert!(issuer.validate_token(&token).is_ok());

        let expects_other_issuer = JwtService::new(SECRET).with_issuer("https://elsewhere");
        assert!(expects_other_issuer.validate_token(&token).is_err());

        let untagged = JwtService::new(SECRET).create_token("user_1", None, 60).unwrap();
        let expects_audience = JwtService::new(SECRET).with_audience("ppty");
        assert!(expects_audience.validate_token(&untagged).is_err());
    }

    #[test]
    fn test_from_config() {
        let config = AuthConfig {
            jwt_secret: "s3cret-s3cret-s3cret-s3cret-s3cret".into(),
            issuer: Some("iss".into()),
            audience: None,
        };
        let service = JwtService::from_config(&config);
        let token = service.create_token("user_9", None, 60).unwrap();
        assert_eq!(service.validate_token(&token).unwrap().iss.as_deref(), Some("iss"));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer  abc123 "), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token("Bearer"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }
}
