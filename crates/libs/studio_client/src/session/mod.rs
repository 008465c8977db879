mod error;
mod file_store;
mod store;

pub use error::SessionError;
pub use file_store::FileSessionStore;
pub use store::*;

use common_types::UserRole;

/// Route guard: the cached role of the logged-in user, or an error when the
/// session is missing or only half present.
pub fn require_session(store: &dyn SessionStore) -> Result<Option<UserRole>, SessionError> {
    if store.get().is_none() {
        return Err(SessionError::NoSession);
    }
    Ok(store.role())
}
