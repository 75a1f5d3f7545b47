pub mod roles;
pub mod token;

pub use roles::Role;
pub use token::{issue_token, verify_token, Claims, TokenError};
