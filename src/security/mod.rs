use crate::api::rest::{ApiError, AppState};
use crate::config::SecurityConfig;
use crate::error::Error;
use anyhow::Result;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
};
use jsonwebtoken::{decode, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure. Tokens are issued by the external identity provider;
/// this service only validates them against the shared secret.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User name
    pub name: String,
    /// User role
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// Get the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|e| Error::Authentication(format!("Invalid user ID in token: {}", e)).into())
    }
}

/// Security service for validating bearer tokens
pub struct SecurityService {
    config: SecurityConfig,
}

impl SecurityService {
    /// Create a new security service
    pub fn new(config: SecurityConfig) -> Self {
        Self { config }
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| Error::Authentication(format!("Invalid token: {}", e)))?;

        Ok(token_data)
    }
}

/// Extract validated claims from the Authorization header, rejecting the
/// request with a 401 envelope when no valid session is presented.
#[async_trait]
impl FromRequestParts<AppState> for Claims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let unauthorized = |message: &str| ApiError {
            error: message.to_string(),
            status: StatusCode::UNAUTHORIZED.as_u16(),
        };

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| unauthorized("Missing authorization header"))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Malformed authorization header"))?;

        let token_data = state
            .security
            .validate_token(token)
            .map_err(|e| unauthorized(&e.to_string()))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn service(secret: &str) -> SecurityService {
        SecurityService::new(SecurityConfig {
            jwt_secret: secret.to_string(),
        })
    }

    fn issue(secret: &str, expires_in_secs: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            name: "guard".to_string(),
            role: "admin".to_string(),
            exp: (now + expires_in_secs) as usize,
            iat: now as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_round_trips() {
        let service = service("test-secret");
        let token = issue("test-secret", 3600);

        let data = service.validate_token(&token).unwrap();
        assert_eq!(data.claims.name, "guard");
        assert!(data.claims.user_id().is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let service = service("test-secret");
        let token = issue("other-secret", 3600);

        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = service("test-secret");
        let token = issue("test-secret", -3600);

        assert!(service.validate_token(&token).is_err());
    }
}
