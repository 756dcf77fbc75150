pub mod auth;
pub mod fallback;
pub mod response;

pub use auth::{extract_bearer_token, require_auth, AuthGate};
pub use fallback::{method_not_allowed_envelope, not_found};
pub use response::{ApiResponse, ApiResult};
