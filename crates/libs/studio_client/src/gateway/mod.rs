mod client;
mod error;
mod outcome;
mod policy;
mod request;

pub use client::*;
pub use error::*;
pub use outcome::*;
pub use policy::*;
pub use request::*;

/// Endpoint that exchanges credentials for a token pair.
pub const LOGIN_PATH: &str = "users/login";
/// Endpoint that mints a new access token from the refresh token.
pub const REFRESH_PATH: &str = "users/refresh";
pub const LOGOUT_PATH: &str = "users/logout";
