use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub trust: TrustConfig,
    pub cache: CacheConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the user service that answers `/api/oauth/me`
    pub user_service_url: String,
    pub introspection_timeout_ms: u64,
    /// Upper bound for a single strategy's `authenticate` call
    pub strategy_timeout_ms: u64,
    /// HS256 key for locally issued session tokens; the JWT strategy is off without it
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustConfig {
    #[serde(skip_serializing)]
    pub shared_secret: Option<String>,
    pub trusted_service_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub default_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AuthConfig {
    pub fn introspection_timeout(&self) -> Duration {
        Duration::from_millis(self.introspection_timeout_ms)
    }

    pub fn strategy_timeout(&self) -> Duration {
        Duration::from_millis(self.strategy_timeout_ms)
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("PORTFOLIO_API_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env::var("PORTFOLIO_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Auth overrides
        if let Ok(v) = env::var("USER_SERVICE_URL") {
            self.auth.user_service_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("AUTH_INTROSPECTION_TIMEOUT_MS") {
            self.auth.introspection_timeout_ms = v.parse().unwrap_or(self.auth.introspection_timeout_ms);
        }
        if let Ok(v) = env::var("AUTH_STRATEGY_TIMEOUT_MS") {
            self.auth.strategy_timeout_ms = v.parse().unwrap_or(self.auth.strategy_timeout_ms);
        }
        self.auth.jwt_secret = non_empty_var("AUTH_JWT_SECRET");

        // Trust overrides
        self.trust.shared_secret = non_empty_var("AIRFLOW_SECRET");
        if let Ok(v) = env::var("TRUSTED_SERVICE_NAME") {
            self.trust.trusted_service_name = v;
        }

        // Cache overrides
        if let Ok(v) = env::var("CACHE_DEFAULT_TTL_SECS") {
            self.cache.default_ttl_secs = v.parse().unwrap_or(self.cache.default_ttl_secs);
        }
        if let Ok(v) = env::var("CACHE_SWEEP_INTERVAL_SECS") {
            match v.parse::<u64>() {
                Ok(secs) if secs > 0 => self.cache.sweep_interval_secs = secs,
                _ => tracing::warn!(
                    "Ignoring CACHE_SWEEP_INTERVAL_SECS={:?}; keeping {}s",
                    v,
                    self.cache.sweep_interval_secs
                ),
            }
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5201,
            },
            auth: AuthConfig {
                user_service_url: "http://localhost:5200".to_string(),
                introspection_timeout_ms: 10_000,
                strategy_timeout_ms: 15_000,
                jwt_secret: None,
            },
            trust: TrustConfig {
                shared_secret: None,
                trusted_service_name: "backend-AI".to_string(),
            },
            cache: CacheConfig {
                default_ttl_secs: 300, // 5 minutes
                sweep_interval_secs: 60,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:3001".to_string()],
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5201,
            },
            auth: AuthConfig {
                user_service_url: "http://backend-user:5200".to_string(),
                introspection_timeout_ms: 5_000,
                strategy_timeout_ms: 8_000,
                jwt_secret: None,
            },
            trust: TrustConfig {
                shared_secret: None,
                trusted_service_name: "backend-AI".to_string(),
            },
            cache: CacheConfig {
                default_ttl_secs: 300,
                sweep_interval_secs: 60,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5201,
            },
            auth: AuthConfig {
                user_service_url: "http://backend-user:5200".to_string(),
                introspection_timeout_ms: 3_000,
                strategy_timeout_ms: 5_000,
                jwt_secret: None,
            },
            trust: TrustConfig {
                shared_secret: None,
                trusted_service_name: "backend-AI".to_string(),
            },
            cache: CacheConfig {
                default_ttl_secs: 300,
                sweep_interval_secs: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
