use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{RequestInfo, TrustDecision};
use crate::error::ApiError;
use crate::state::AppState;

/// Guards service-to-service routes with the trust gate instead of user auth.
pub async fn service_trust_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let info = RequestInfo::from_request(&request);

    match state.trust.evaluate(&info) {
        TrustDecision::Internal | TrustDecision::AuthorizedExternal => Ok(next.run(request).await),
        TrustDecision::Misconfigured => Err(ApiError::service_unavailable(
            "Shared service secret not configured on server",
        )),
        TrustDecision::Unauthorized => Err(ApiError::unauthorized("Invalid or missing service credentials")),
    }
}
