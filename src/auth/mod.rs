//! Authentication and anti-forgery support.

pub mod credentials;
pub mod tokens;

pub use credentials::Credential;
pub use tokens::{CSRF_FIELD, TokenStore};
