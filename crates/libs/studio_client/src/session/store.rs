use crate::session::SessionError;
use common_types::UserRole;
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};

/// The access/refresh token pair of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Durable holder of the session tokens and the cached user role.
///
/// Implementations enforce the both-or-neither rule: a state holding only one
/// of the two tokens reads back as logged out.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<SessionTokens>;
    fn set(&self, tokens: SessionTokens) -> Result<(), SessionError>;
    /// Replaces the access token, keeping the refresh token.
    ///
    /// Fails with [`SessionError::NoSession`] when there is no complete pair to update.
    fn set_access_token(&self, access_token: String) -> Result<(), SessionError>;
    fn role(&self) -> Option<UserRole>;
    fn set_role(&self, role: Option<UserRole>) -> Result<(), SessionError>;
    /// Removes both tokens and the role together.
    fn clear(&self) -> Result<(), SessionError>;

    fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

/// The three keys the session is persisted under.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<UserRole>,
}

impl StoredSession {
    pub fn tokens(&self) -> Option<SessionTokens> {
        match (&self.access_token, &self.refresh_token) {
            (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
                Some(SessionTokens {
                    access_token: access.clone(),
                    refresh_token: refresh.clone(),
                })
            }
            _ => None,
        }
    }

    pub fn with_tokens(&self, tokens: SessionTokens) -> Self {
        Self {
            access_token: Some(tokens.access_token),
            refresh_token: Some(tokens.refresh_token),
            user_role: self.user_role,
        }
    }

    pub fn with_access_token(&self, access_token: String) -> Result<Self, SessionError> {
        let Some(tokens) = self.tokens() else {
            return Err(SessionError::NoSession);
        };
        Ok(self.with_tokens(SessionTokens {
            access_token,
            refresh_token: tokens.refresh_token,
        }))
    }
}

/// Session kept for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    state: RwLock<StoredSession>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tokens(tokens: SessionTokens) -> Self {
        let store = Self::default();
        *store.state.write().unwrap_or_else(PoisonError::into_inner) =
            StoredSession::default().with_tokens(tokens);
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<SessionTokens> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .tokens()
    }

    fn set(&self, tokens: SessionTokens) -> Result<(), SessionError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = state.with_tokens(tokens);
        Ok(())
    }

    fn set_access_token(&self, access_token: String) -> Result<(), SessionError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = state.with_access_token(access_token)?;
        Ok(())
    }

    fn role(&self) -> Option<UserRole> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.tokens().and(state.user_role)
    }

    fn set_role(&self, role: Option<UserRole>) -> Result<(), SessionError> {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .user_role = role;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = StoredSession::default();
        Ok(())
    }
}
