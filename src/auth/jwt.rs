use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::bearer::BearerCredential;
use super::identity::{Claim, ClaimKind, Identity};
use super::request::RequestInfo;
use super::strategy::{AuthenticationStrategy, StrategyOutcome};

pub const JWT_SCHEME: &str = "Jwt";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(sub: Uuid, email: String, name: String, is_admin: bool, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub,
            email,
            name,
            is_admin,
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
        }
    }

    fn into_identity(self) -> Identity {
        Identity::new(
            JWT_SCHEME,
            vec![
                Claim::new(ClaimKind::Subject, self.sub.to_string()),
                Claim::new(ClaimKind::Email, self.email),
                Claim::new(ClaimKind::Name, self.name),
                Claim::new(ClaimKind::IsAdmin, self.is_admin.to_string()),
            ],
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// Signs session claims with HS256.
pub fn issue_token(claims: &SessionClaims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Locally signed session tokens. Verification needs no network hop, so this
/// strategy is registered ahead of OAuth2 introspection; a token it cannot
/// verify is left for the strategies after it.
pub struct JwtSessionStrategy {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionStrategy {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

fn looks_like_jwt(token: &str) -> bool {
    let mut segments = token.split('.');
    let shaped = segments.by_ref().take(3).filter(|s| !s.is_empty()).count() == 3;
    shaped && segments.next().is_none()
}

#[async_trait]
impl AuthenticationStrategy for JwtSessionStrategy {
    fn name(&self) -> &'static str {
        "jwt-session"
    }

    fn can_handle(&self, request: &RequestInfo) -> bool {
        match BearerCredential::parse(request.authorization()) {
            BearerCredential::Token(token) => looks_like_jwt(token),
            _ => false,
        }
    }

    async fn authenticate(&self, request: &RequestInfo) -> StrategyOutcome {
        let BearerCredential::Token(token) = BearerCredential::parse(request.authorization()) else {
            return StrategyOutcome::NotApplicable;
        };

        match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => {
                tracing::debug!("Verified session token for user {}", data.claims.sub);
                StrategyOutcome::Authenticated(data.claims.into_identity())
            }
            Err(e) => {
                tracing::debug!("Session token rejected: {}", e);
                StrategyOutcome::Rejected
            }
        }
    }
}
