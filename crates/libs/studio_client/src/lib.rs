#![deny(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_possible_truncation,
    clippy::module_inception
)]

pub mod api;
pub mod checkout;
pub mod gateway;
pub mod notify;
pub mod session;
pub mod upload;
pub mod validation;

pub use gateway::{Gateway, GatewayError};
pub use notify::{MemoryNotifier, Notification, NotificationLevel, Notifier, TracingNotifier};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore, SessionTokens};
