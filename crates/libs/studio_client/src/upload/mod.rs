mod error;
mod file;
mod guard;
mod progress;
mod publisher;
mod storage;

pub use error::*;
pub use file::*;
pub use guard::*;
pub use progress::*;
pub use publisher::*;
pub use storage::*;
