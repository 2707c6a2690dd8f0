use std::sync::Arc;

use crate::auth::{
    default_registry, AuthenticationContext, AuthorizationPaths, HttpTokenIntrospector, ServiceTrustGate,
    TokenIntrospector,
};
use crate::cache::TtlCache;
use crate::config::AppConfig;
use crate::error::AuthError;

/// Shared, immutable wiring handed to every middleware and handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub paths: Arc<AuthorizationPaths>,
    pub auth: Arc<AuthenticationContext>,
    pub trust: Arc<ServiceTrustGate>,
    pub cache: Arc<TtlCache>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self, AuthError> {
        let introspector = Arc::new(HttpTokenIntrospector::from_config(&config.auth)?);
        Ok(Self::with_introspector(config, introspector))
    }

    /// Wires the pipeline around a caller-supplied introspector.
    pub fn with_introspector(config: &AppConfig, introspector: Arc<dyn TokenIntrospector>) -> Self {
        let registry = default_registry(&config.auth, introspector);
        tracing::info!("Authentication strategies registered: {:?}", registry.names());

        Self {
            paths: Arc::new(AuthorizationPaths::default()),
            auth: Arc::new(AuthenticationContext::new(registry, config.auth.strategy_timeout())),
            trust: Arc::new(ServiceTrustGate::from_config(&config.trust)),
            cache: Arc::new(TtlCache::new(config.cache.default_ttl())),
        }
    }
}
