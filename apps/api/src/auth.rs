//! Bearer-token identity. Handlers take an [`AuthUser`] argument; the
//! extractor verifies the token through the configured [`IdentityProvider`].

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Token expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Opaque token in, stable user id out.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, token: &str) -> Result<String, AuthError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// HS256 JWTs signed with a shared secret; the `sub` claim is the user id.
pub struct JwtIdentity {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentity {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentity {
    async fn verify(&self, token: &str) -> Result<String, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid(e.to_string()),
            }
        })?;
        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::Invalid("empty subject".to_string()));
        }
        Ok(data.claims.sub)
    }
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).map_err(|e| {
            debug!("Rejecting request: {e}");
            AppError::Unauthorized
        })?;
        let user_id = state.identity.verify(token).await.map_err(|e| {
            debug!("Rejecting request: {e}");
            AppError::Unauthorized
        })?;
        Ok(AuthUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token_for(sub: &str, secret: &str, exp_offset_secs: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset_secs) as usize;
        let claims = Claims {
            sub: sub.to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_yields_subject() {
        let identity = JwtIdentity::new(SECRET);
        let token = token_for("user-42", SECRET, 3600);
        assert_eq!(identity.verify(&token).await.unwrap(), "user-42");
    }

    #[tokio::test]
    async fn test_expired_token() {
        let identity = JwtIdentity::new(SECRET);
        let token = token_for("user-42", SECRET, -3600);
        assert!(matches!(identity.verify(&token).await, Err(AuthError::Expired)));
    }

    #[tokio::test]
    async fn test_wrong_secret_and_garbage_are_invalid() {
        let identity = JwtIdentity::new(SECRET);
        let forged = token_for("user-42", "other-secret", 3600);
        assert!(matches!(identity.verify(&forged).await, Err(AuthError::Invalid(_))));
        assert!(matches!(identity.verify("not.a.jwt").await, Err(AuthError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_empty_subject_is_invalid() {
        let identity = JwtIdentity::new(SECRET);
        let token = token_for("", SECRET, 3600);
        assert!(matches!(identity.verify(&token).await, Err(AuthError::Invalid(_))));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let (parts, _) = Request::builder()
            .header(AUTHORIZATION, "Bearer abc.def.ghi")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def.ghi");

        let (parts, _) = Request::builder()
            .header(AUTHORIZATION, "Basic dXNlcg==")
            .body(())
            .unwrap()
            .into_parts();
        assert!(matches!(bearer_token(&parts), Err(AuthError::MissingToken)));

        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert!(matches!(bearer_token(&parts), Err(AuthError::MissingToken)));
    }
}
