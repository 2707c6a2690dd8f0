use std::sync::Arc;

use async_trait::async_trait;

use super::identity::Identity;
use super::request::RequestInfo;
use crate::error::AuthError;

/// Result of one strategy's attempt at a request.
#[derive(Debug)]
pub enum StrategyOutcome {
    Authenticated(Identity),
    /// The request does not carry this strategy's credential
    NotApplicable,
    /// Credential present but not valid (bad format, empty, expired, unknown)
    Rejected,
    /// The strategy could not reach a verdict, e.g. the introspection call failed
    Failed(AuthError),
}

impl StrategyOutcome {
    pub fn identity(self) -> Option<Identity> {
        match self {
            StrategyOutcome::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

/// One credential scheme the coordinator can try.
///
/// Implementations hold no per-request state; collaborators are injected at
/// construction.
#[async_trait]
pub trait AuthenticationStrategy: Send + Sync {
    /// Strategy name for logging and debugging
    fn name(&self) -> &'static str;

    /// Cheap check on request shape; no I/O.
    fn can_handle(&self, request: &RequestInfo) -> bool;

    async fn authenticate(&self, request: &RequestInfo) -> StrategyOutcome;
}

pub type SharedStrategy = Arc<dyn AuthenticationStrategy>;

/// Ordered list of strategies. Registration order is priority order and the
/// first strategy to authenticate wins.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: Vec<SharedStrategy>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, strategy: SharedStrategy) -> &mut Self {
        tracing::debug!(
            "Registered authentication strategy '{}' at priority {}",
            strategy.name(),
            self.strategies.len()
        );
        self.strategies.push(strategy);
        self
    }

    pub fn with(mut self, strategy: SharedStrategy) -> Self {
        self.register(strategy);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedStrategy> {
        self.strategies.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}
