// GET /api/auth/whoami - the identity the authentication middleware resolved

use axum::Extension;
use serde::Serialize;

use crate::auth::{Claim, Identity};
use crate::middleware::ApiResponse;

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub scheme: String,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub is_admin: bool,
    pub claims: Vec<Claim>,
}

pub async fn whoami_get(Extension(identity): Extension<Identity>) -> ApiResponse<WhoAmI> {
    ApiResponse::success(WhoAmI {
        scheme: identity.scheme().to_string(),
        user_id: identity.subject_id().map(str::to_string),
        email: identity.email().map(str::to_string),
        name: identity.name().map(str::to_string),
        is_admin: identity.is_admin(),
        claims: identity.claims().to_vec(),
    })
}
