use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::RequestInfo;
use crate::error::ApiError;
use crate::state::AppState;

/// User authentication middleware.
///
/// Public paths pass straight through. Everything else must be claimed by one
/// of the registered strategies; the resulting `Identity` is injected into the
/// request extensions for handlers to extract.
pub async fn authentication_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let info = RequestInfo::from_request(&request);

    if !state.paths.requires_authentication_for(&info) {
        tracing::debug!("{} {} is public", info.method, info.path.as_deref().unwrap_or(""));
        return Ok(next.run(request).await);
    }

    let identity = state
        .auth
        .authenticate(Some(&info))
        .await
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
