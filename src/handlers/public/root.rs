// GET / - service banner

use serde_json::{json, Value};

use crate::middleware::ApiResponse;

pub async fn root_get() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": "Portfolio API (Rust)",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "auth": "/api/auth/whoami (protected)",
            "technews": "GET /api/technews (protected), POST /api/technews (internal services)",
        }
    }))
}
