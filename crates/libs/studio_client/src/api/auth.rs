use crate::api::ApiError;
use crate::gateway::{ApiRequest, Gateway, GatewayError, LOGIN_PATH, LOGOUT_PATH, RefreshFailure};
use crate::session::{SessionStore, SessionTokens};
use crate::validation;
use common_types::{LoginResponse, LoginUser, RefreshTokenPayload, RegisterUser, User};
use tracing::{info, warn};

#[derive(Clone)]
pub struct AuthApi {
    gateway: Gateway,
}

impl AuthApi {
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    fn session(&self) -> &dyn SessionStore {
        self.gateway.session().as_ref()
    }

    /// Exchanges credentials for a token pair and stores it with the user's role.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = ApiRequest::post(LOGIN_PATH).json(&LoginUser {
            email: email.to_owned(),
            password: password.to_owned(),
        })?;
        let response: LoginResponse = self.gateway.send(request).await?;

        self.session().set(SessionTokens {
            access_token: response.access_token.clone(),
            refresh_token: response.refresh_token.clone(),
        })?;
        self.session()
            .set_role(response.user.as_ref().map(|u| u.role))?;
        info!("Logged in as {email}");
        Ok(response)
    }

    /// Mints a new access token, sharing any refresh already in flight.
    pub async fn refresh(&self) -> Result<String, RefreshFailure> {
        self.gateway.refresh_access_token().await
    }

    /// Revokes the refresh token server side and always clears the local session.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Some(tokens) = self.session().get() {
            let request = ApiRequest::post(LOGOUT_PATH)
                .json(&RefreshTokenPayload {
                    refresh_token: tokens.refresh_token,
                })?
                .quiet();
            if let Err(e) = self.gateway.send::<serde_json::Value>(request).await {
                warn!("Logout request failed, clearing local session anyway: {e}");
            }
        }
        self.session().clear()?;
        info!("Logged out");
        Ok(())
    }

    pub async fn register(&self, registration: &RegisterUser) -> Result<User, ApiError> {
        validation::check(registration, self.gateway.notifier().as_ref())?;
        Ok(self.gateway.post("users/register", registration).await?)
    }

    pub async fn me(&self) -> Result<User, GatewayError> {
        self.gateway.get("users/me").await
    }
}
