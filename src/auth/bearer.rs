use std::sync::Arc;

use async_trait::async_trait;

use super::introspect::TokenIntrospector;
use super::request::RequestInfo;
use super::strategy::{AuthenticationStrategy, StrategyOutcome};

const BEARER_PREFIX: &str = "Bearer ";

/// An `Authorization` header value classified by shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BearerCredential<'a> {
    /// Header absent, or not using the `Bearer ` scheme
    Malformed,
    /// `Bearer ` followed by nothing but whitespace
    Empty,
    Token(&'a str),
}

impl<'a> BearerCredential<'a> {
    /// The scheme match is case-insensitive and requires a literal space after
    /// `Bearer`; `"Bearer\t"` is malformed while `"Bearer   "` is empty.
    pub fn parse(header: Option<&'a str>) -> Self {
        let Some(header) = header else {
            return BearerCredential::Malformed;
        };
        if !has_bearer_prefix(header) {
            return BearerCredential::Malformed;
        }

        let token = header[BEARER_PREFIX.len()..].trim();
        if token.is_empty() {
            BearerCredential::Empty
        } else {
            BearerCredential::Token(token)
        }
    }
}

fn has_bearer_prefix(header: &str) -> bool {
    header
        .get(..BEARER_PREFIX.len())
        .map(|scheme| scheme.eq_ignore_ascii_case(BEARER_PREFIX))
        .unwrap_or(false)
}

/// OAuth2 access tokens, validated by the user service.
pub struct OAuth2BearerStrategy {
    introspector: Arc<dyn TokenIntrospector>,
}

impl OAuth2BearerStrategy {
    pub fn new(introspector: Arc<dyn TokenIntrospector>) -> Self {
        Self { introspector }
    }
}

#[async_trait]
impl AuthenticationStrategy for OAuth2BearerStrategy {
    fn name(&self) -> &'static str {
        "oauth2-bearer"
    }

    fn can_handle(&self, request: &RequestInfo) -> bool {
        request.authorization().map(has_bearer_prefix).unwrap_or(false)
    }

    async fn authenticate(&self, request: &RequestInfo) -> StrategyOutcome {
        let token = match BearerCredential::parse(request.authorization()) {
            BearerCredential::Token(token) => token,
            BearerCredential::Malformed => {
                tracing::warn!("Missing or invalid Authorization header format");
                return StrategyOutcome::NotApplicable;
            }
            BearerCredential::Empty => {
                tracing::warn!("Empty token in Authorization header");
                return StrategyOutcome::Rejected;
            }
        };

        match self.introspector.introspect(token).await {
            Ok(Some(identity)) => {
                tracing::info!(
                    "Successfully validated token for user {}",
                    identity.subject_id().unwrap_or("<unknown>")
                );
                StrategyOutcome::Authenticated(identity)
            }
            Ok(None) => {
                tracing::warn!("Invalid or expired access token");
                StrategyOutcome::Rejected
            }
            Err(e) => {
                tracing::error!("Error occurred during OAuth2 authentication: {}", e);
                StrategyOutcome::Failed(e)
            }
        }
    }
}
