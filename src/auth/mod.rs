// Authentication pipeline: path classification, service trust, and
// strategy-based user authentication

pub mod bearer;
pub mod context;
pub mod identity;
pub mod introspect;
pub mod jwt;
pub mod paths;
pub mod request;
pub mod strategy;
pub mod trust;

use std::sync::Arc;

pub use bearer::{BearerCredential, OAuth2BearerStrategy};
pub use context::AuthenticationContext;
pub use identity::{Claim, ClaimKind, Identity, UserInfo};
pub use introspect::{HttpTokenIntrospector, TokenIntrospector};
pub use jwt::{issue_token, JwtSessionStrategy, SessionClaims};
pub use paths::AuthorizationPaths;
pub use request::RequestInfo;
pub use strategy::{AuthenticationStrategy, StrategyOutcome, StrategyRegistry};
pub use trust::{ServiceTrustGate, TrustDecision};

use crate::config::AuthConfig;

/// Default strategy order: session JWTs (when a signing key is configured),
/// then OAuth2 bearer tokens checked against the given introspector.
pub fn default_registry(config: &AuthConfig, introspector: Arc<dyn TokenIntrospector>) -> StrategyRegistry {
    let mut registry = StrategyRegistry::new();
    if let Some(secret) = config.jwt_secret.as_deref() {
        registry.register(Arc::new(JwtSessionStrategy::new(secret)));
    }
    registry.register(Arc::new(OAuth2BearerStrategy::new(introspector)));
    registry
}
