use subtle::ConstantTimeEq;

use super::bearer::BearerCredential;
use super::request::RequestInfo;
use crate::config::TrustConfig;

pub const SERVICE_NAME_HEADER: &str = "x-service-name";
pub const SHARED_SECRET_HEADER: &str = "x-airflow-secret";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustDecision {
    /// Loopback origin or a recognised internal service
    Internal,
    /// External caller that presented the shared secret
    AuthorizedExternal,
    Unauthorized,
    /// No shared secret configured; external callers cannot be admitted
    Misconfigured,
}

impl TrustDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, TrustDecision::Internal | TrustDecision::AuthorizedExternal)
    }
}

/// Gate for service-to-service endpoints such as the tech-news ingestion route.
#[derive(Clone)]
pub struct ServiceTrustGate {
    shared_secret: Option<String>,
    trusted_service_name: String,
}

impl ServiceTrustGate {
    pub fn new(shared_secret: Option<String>, trusted_service_name: impl Into<String>) -> Self {
        Self {
            shared_secret: shared_secret.filter(|s| !s.is_empty()),
            trusted_service_name: trusted_service_name.into(),
        }
    }

    pub fn from_config(config: &TrustConfig) -> Self {
        Self::new(config.shared_secret.clone(), config.trusted_service_name.clone())
    }

    pub fn is_service_to_service_call(&self, request: &RequestInfo) -> bool {
        let loopback = request.remote_addr.map(|ip| ip.is_loopback()).unwrap_or(false);

        let local_host = request
            .host
            .as_deref()
            .map(|host| host.eq_ignore_ascii_case("localhost") || host == "127.0.0.1")
            .unwrap_or(false);

        let internal_service = request
            .header(SERVICE_NAME_HEADER)
            .map(|name| name.trim().eq_ignore_ascii_case(&self.trusted_service_name))
            .unwrap_or(false);

        loopback || local_host || internal_service
    }

    pub fn is_authorized_external_call(&self, request: &RequestInfo) -> bool {
        let Some(secret) = self.shared_secret.as_deref() else {
            tracing::error!("Shared service secret (AIRFLOW_SECRET) is not configured; rejecting external call");
            return false;
        };

        let bearer_matches = match BearerCredential::parse(request.authorization()) {
            BearerCredential::Token(token) => secret_matches(token, secret),
            _ => false,
        };

        let header_matches = request
            .header(SHARED_SECRET_HEADER)
            .map(|value| secret_matches(value, secret))
            .unwrap_or(false);

        if bearer_matches || header_matches {
            tracing::debug!("External call authorized with shared secret");
            return true;
        }

        tracing::warn!(
            "Unauthorized external call to {}: invalid or missing service secret",
            request.path.as_deref().unwrap_or("<none>")
        );
        false
    }

    pub fn evaluate(&self, request: &RequestInfo) -> TrustDecision {
        if self.is_service_to_service_call(request) {
            return TrustDecision::Internal;
        }
        if self.shared_secret.is_none() {
            tracing::error!("Shared service secret (AIRFLOW_SECRET) is not configured; rejecting external call");
            return TrustDecision::Misconfigured;
        }
        if self.is_authorized_external_call(request) {
            TrustDecision::AuthorizedExternal
        } else {
            TrustDecision::Unauthorized
        }
    }
}

impl std::fmt::Debug for ServiceTrustGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceTrustGate")
            .field("shared_secret", &self.shared_secret.as_ref().map(|_| "<redacted>"))
            .field("trusted_service_name", &self.trusted_service_name)
            .finish()
    }
}

fn secret_matches(candidate: &str, secret: &str) -> bool {
    candidate.as_bytes().ct_eq(secret.as_bytes()).into()
}
