pub mod auth;
pub mod guard;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use guard::{policy, require_roles};
pub use response::ApiResponse;
