pub mod auth;
pub mod response;
pub mod security_headers;
pub mod trust;

pub use auth::authentication_middleware;
pub use response::{ApiResponse, ApiResult};
pub use security_headers::apply_security_headers;
pub use trust::service_trust_middleware;
