use crate::gateway::{LOGIN_PATH, REFRESH_PATH};
use reqwest::StatusCode;

/// Which auth role an endpoint plays, as far as the error path is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Login,
    Refresh,
    Other,
}

impl EndpointKind {
    #[must_use]
    pub fn of(path: &str) -> Self {
        let path = path.trim_matches('/');
        if path.ends_with(REFRESH_PATH) {
            Self::Refresh
        } else if path.ends_with(LOGIN_PATH) {
            Self::Login
        } else {
            Self::Other
        }
    }

    /// Login and refresh never carry a bearer credential.
    #[must_use]
    pub const fn is_auth_endpoint(self) -> bool {
        matches!(self, Self::Login | Self::Refresh)
    }
}

/// What to do with an error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStep {
    /// The refresh token is no longer valid: drop the session and reject.
    ClearSession,
    /// Resolve with an empty result instead of rejecting.
    SoftResolve,
    /// Refresh the access token and replay the request.
    Refresh,
    /// Notify and reject.
    Fail,
}

/// Lifecycle of a single call through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayState {
    Normal,
    Refreshing,
    Replayed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_auth_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_auth_retries: 1,
        }
    }
}

impl RetryPolicy {
    /// Decides the next step for an error response. `retries` counts the
    /// refresh-and-replay cycles this request has already been through.
    #[must_use]
    pub fn next_step(&self, kind: EndpointKind, status: Option<StatusCode>, retries: u32) -> ErrorStep {
        match (kind, status) {
            (EndpointKind::Refresh, Some(StatusCode::UNAUTHORIZED)) => ErrorStep::ClearSession,
            (EndpointKind::Refresh, _) => ErrorStep::SoftResolve,
            (EndpointKind::Other, Some(StatusCode::UNAUTHORIZED))
                if retries < self.max_auth_retries =>
            {
                ErrorStep::Refresh
            }
            _ => ErrorStep::Fail,
        }
    }
}
