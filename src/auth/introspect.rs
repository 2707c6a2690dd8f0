use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::identity::{Identity, UserInfo};
use crate::config::AuthConfig;
use crate::error::AuthError;

pub const OAUTH2_SCHEME: &str = "OAuth2";

/// Resolves a bearer token to the identity it belongs to.
///
/// `Ok(None)` means the token is not valid; `Err` means no verdict could be
/// reached (network failure, timeout).
#[async_trait]
pub trait TokenIntrospector: Send + Sync {
    async fn introspect(&self, token: &str) -> Result<Option<Identity>, AuthError>;
}

/// Asks the user service who owns a token via `GET /api/oauth/me`.
#[derive(Debug, Clone)]
pub struct HttpTokenIntrospector {
    client: reqwest::Client,
    me_url: Url,
}

impl HttpTokenIntrospector {
    pub fn new(user_service_url: &str, timeout: Duration) -> Result<Self, AuthError> {
        let mut me_url = Url::parse(user_service_url)
            .map_err(|e| AuthError::Configuration(format!("invalid user service URL '{}': {}", user_service_url, e)))?;

        // Appended below any path prefix the base URL carries (e.g. behind a gateway)
        me_url
            .path_segments_mut()
            .map_err(|_| AuthError::Configuration(format!("user service URL '{}' cannot be a base", user_service_url)))?
            .pop_if_empty()
            .extend(["api", "oauth", "me"]);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, me_url })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::new(&config.user_service_url, config.introspection_timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.me_url
    }
}

#[async_trait]
impl TokenIntrospector for HttpTokenIntrospector {
    async fn introspect(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        tracing::debug!("Validating token with user service at {} (token length {})", self.me_url, token.len());

        let response = self
            .client
            .get(self.me_url.clone())
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Token validation failed with status: {}", status);
            return Ok(None);
        }

        let body = response.text().await?;
        let user: UserInfo = match serde_json::from_str(&body) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Failed to deserialize user info from token validation: {}", e);
                return Ok(None);
            }
        };

        tracing::debug!("User service resolved token to user {}", user.user_id);
        Ok(Some(Identity::from_user(OAUTH2_SCHEME, &user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_me_endpoint_from_base_url() {
        let introspector = HttpTokenIntrospector::new("http://localhost:5200", Duration::from_secs(1)).unwrap();
        assert_eq!(introspector.endpoint().as_str(), "http://localhost:5200/api/oauth/me");
    }

    #[test]
    fn keeps_base_url_path_prefix() {
        for base in ["http://gateway.local/user-service", "http://gateway.local/user-service/"] {
            let introspector = HttpTokenIntrospector::new(base, Duration::from_secs(1)).unwrap();
            assert_eq!(
                introspector.endpoint().as_str(),
                "http://gateway.local/user-service/api/oauth/me",
                "base {}",
                base
            );
        }
    }

    #[test]
    fn rejects_non_hierarchical_url() {
        let err = HttpTokenIntrospector::new("mailto:users@example.com", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, AuthError::Configuration(_)));
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = HttpTokenIntrospector::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, AuthError::Configuration(_)));
    }
}
