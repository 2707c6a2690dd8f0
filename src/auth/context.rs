use std::time::{Duration, Instant};

use tokio::time::timeout;

use super::identity::Identity;
use super::request::RequestInfo;
use super::strategy::{StrategyOutcome, StrategyRegistry};
use crate::error::AuthError;

/// Tries registered strategies in priority order and returns the first
/// identity one of them produces.
///
/// A strategy that fails or overruns its time budget is logged and skipped;
/// it never blocks the strategies after it.
#[derive(Debug, Clone)]
pub struct AuthenticationContext {
    registry: StrategyRegistry,
    strategy_timeout: Duration,
}

impl AuthenticationContext {
    pub fn new(registry: StrategyRegistry, strategy_timeout: Duration) -> Self {
        Self {
            registry,
            strategy_timeout,
        }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub async fn authenticate(&self, request: Option<&RequestInfo>) -> Option<Identity> {
        let Some(request) = request else {
            tracing::warn!("Request is missing; cannot authenticate");
            return None;
        };

        let start_time = Instant::now();

        for strategy in self.registry.iter() {
            let name = strategy.name();
            if !strategy.can_handle(request) {
                continue;
            }

            tracing::debug!("Using authentication strategy '{}'", name);

            let outcome = match timeout(self.strategy_timeout, strategy.authenticate(request)).await {
                Ok(outcome) => outcome,
                Err(_) => StrategyOutcome::Failed(AuthError::Timeout(self.strategy_timeout)),
            };

            match outcome {
                StrategyOutcome::Authenticated(identity) => {
                    tracing::info!(
                        "Successfully authenticated using '{}' in {:?}",
                        name,
                        start_time.elapsed()
                    );
                    return Some(identity);
                }
                StrategyOutcome::Failed(e) => {
                    tracing::error!("Authentication strategy '{}' failed: {}", name, e);
                }
                StrategyOutcome::Rejected => {
                    tracing::debug!("Authentication strategy '{}' rejected the credential", name);
                }
                StrategyOutcome::NotApplicable => {}
            }
        }

        tracing::warn!("No authentication strategy could handle the request");
        None
    }
}
