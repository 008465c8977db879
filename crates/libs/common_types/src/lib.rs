#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools
)]
mod album;
mod auth;
mod booking;
mod envelope;
mod payment;
mod staff;

pub use album::*;
pub use auth::*;
pub use booking::*;
pub use envelope::*;
pub use payment::*;
pub use staff::*;
