use axum::{
    http::{HeaderValue, Method},
    middleware::{from_fn_with_state, map_response},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{internal, protected, public};
use crate::middleware::{apply_security_headers, authentication_middleware, service_trust_middleware};
use crate::state::AppState;

/// Full application router.
///
/// Layer order matters in axum: the authentication layer only wraps the routes
/// added before it, so internal routes are merged afterwards with their own
/// trust layer. `/api/technews` ends up as one method router: GET carries the
/// authentication layer, POST only the trust layer.
pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes())
        .layer(from_fn_with_state(state.clone(), authentication_middleware))
        .merge(internal_routes(state.clone()))
        .layer(map_response(apply_security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(security))
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root_get))
        .route("/health", get(public::health_get))
}

fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/whoami", get(protected::whoami_get))
        .route("/api/technews", get(protected::technews_latest_get))
}

fn internal_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/technews", post(internal::technews_post))
        .route_layer(from_fn_with_state(state, service_trust_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}
