//! HTTP Basic authentication module.

pub mod credentials;
pub mod middleware;

pub use credentials::Credentials;
pub use middleware::BasicUser;
