use crate::gateway::{
    ApiOutcome, ApiRequest, EndpointKind, ErrorStep, GatewayError, GatewayState, REFRESH_PATH,
    RetryPolicy, decode_outcome,
};
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::session::SessionStore;
use app_state::{ApiSettings, StorageSettings};
use bon::bon;
use bytes::Bytes;
use common_types::{RefreshResponse, RefreshTokenPayload};
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

/// Why a token refresh did not produce a new access token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshFailure {
    #[error("No refresh token available")]
    NoRefreshToken,
    #[error("Refresh token was rejected")]
    Revoked,
    #[error("Refresh response did not contain an access token")]
    MissingAccessToken,
    #[error("Refresh failed: {0}")]
    Failed(String),
}

type PendingRefresh = Shared<BoxFuture<'static, Result<String, RefreshFailure>>>;

struct RawResponse {
    status: StatusCode,
    body: Bytes,
}

struct GatewayInner {
    http: Client,
    base_url: Url,
    storage: StorageSettings,
    policy: RetryPolicy,
    session: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    /// The refresh currently in flight, shared by every request that hit a 401 meanwhile.
    pending_refresh: Mutex<Option<PendingRefresh>>,
}

/// The single HTTP entry point for the studio backend.
///
/// Attaches the bearer credential, unwraps response envelopes and turns an
/// expired access token into one coordinated refresh followed by a replay of
/// the original request.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

#[bon]
impl Gateway {
    #[builder(start_fn = from_settings)]
    pub fn new(
        #[builder(start_fn)] api: &ApiSettings,
        #[builder(start_fn)] storage: &StorageSettings,
        session: Arc<dyn SessionStore>,
        notifier: Option<Arc<dyn Notifier>>,
        http_client: Option<Client>,
    ) -> Result<Self, GatewayError> {
        let http = match http_client {
            Some(client) => client,
            None => Client::builder()
                .connect_timeout(api.connect_timeout)
                .timeout(api.timeout)
                .build()?,
        };
        Ok(Self {
            inner: Arc::new(GatewayInner {
                http,
                base_url: api.base_url.clone(),
                storage: storage.clone(),
                policy: RetryPolicy {
                    max_auth_retries: api.max_auth_retries,
                },
                session,
                notifier: notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
                pending_refresh: Mutex::new(None),
            }),
        })
    }
}

impl Gateway {
    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.inner.session
    }

    #[must_use]
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.inner.notifier
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn resolve(&self, request: &ApiRequest) -> Result<Url, GatewayError> {
        let mut url = match Url::parse(&request.target) {
            Ok(absolute) => absolute,
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .inner
                .base_url
                .join(request.target.trim_start_matches('/'))?,
            Err(e) => return Err(e.into()),
        };
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    /// Login, refresh and anything not addressed to the API host (storage
    /// buckets in particular) never receive the bearer credential.
    #[must_use]
    pub fn is_exempt(&self, request: &ApiRequest, url: &Url) -> bool {
        if EndpointKind::of(request.path()).is_auth_endpoint() {
            return true;
        }
        let Some(host) = url.host_str() else {
            return true;
        };
        host != self.inner.base_url.host_str().unwrap_or_default()
            || self.inner.storage.is_exempt_host(host)
    }

    /// The bearer credential the request phase attaches, if any.
    pub fn bearer_for(&self, request: &ApiRequest) -> Result<Option<String>, GatewayError> {
        let url = self.resolve(request)?;
        if self.is_exempt(request, &url) {
            return Ok(None);
        }
        Ok(self.inner.session.get().map(|t| t.access_token))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        self.send(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        self.send(ApiRequest::put(path).json(body)?).await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        self.send(ApiRequest::patch(path).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.send(ApiRequest::delete(path)).await
    }

    /// Sends a request and returns the unwrapped envelope data.
    ///
    /// A 401 on a protected endpoint triggers one coordinated refresh and a
    /// replay with the new access token; the replay's result is the result of
    /// this call. When the refresh fails the session is cleared and the
    /// original error is returned.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, GatewayError> {
        let kind = EndpointKind::of(request.path());
        let url = self.resolve(&request)?;
        let mut bearer = self.bearer_for(&request)?;
        let mut state = GatewayState::Normal;
        let mut retries = 0;

        loop {
            let response = match self.execute(&request, &url, bearer.as_deref()).await {
                Ok(response) => response,
                Err(e) => {
                    return match self.inner.policy.next_step(kind, None, retries) {
                        ErrorStep::SoftResolve => {
                            debug!("Ignoring transport error on {}: {e}", request.path());
                            Ok(serde_json::from_value(serde_json::Value::Null)?)
                        }
                        _ => {
                            let error = GatewayError::Transport(e);
                            self.notify_error(&request, &error);
                            Err(error)
                        }
                    };
                }
            };

            let outcome = match decode_outcome::<T>(&request.method, response.status, &response.body) {
                Ok(outcome) => outcome,
                Err(e) => {
                    let error = GatewayError::Decode(e);
                    self.notify_error(&request, &error);
                    return Err(error);
                }
            };

            match outcome {
                ApiOutcome::Ok { data, message } => {
                    if state == GatewayState::Refreshing {
                        state = GatewayState::Replayed;
                        debug!("{} {} -> {state:?}", request.method, request.path());
                    }
                    if !request.quiet && !message.is_empty() {
                        self.inner.notifier.notify(Notification::success(message));
                    }
                    return Ok(data);
                }
                ApiOutcome::Domain { message } => {
                    let error = GatewayError::Domain { message };
                    self.notify_error(&request, &error);
                    return Err(error);
                }
                ApiOutcome::Transport { status, message } => {
                    let error = GatewayError::Status { status, message };
                    match self.inner.policy.next_step(kind, Some(status), retries) {
                        ErrorStep::ClearSession => {
                            warn!("Refresh token rejected, clearing session");
                            self.clear_session();
                            return Err(error);
                        }
                        ErrorStep::SoftResolve => {
                            debug!("Ignoring {status} on {}", request.path());
                            return Ok(serde_json::from_value(serde_json::Value::Null)?);
                        }
                        ErrorStep::Refresh => {
                            state = GatewayState::Refreshing;
                            retries += 1;
                            debug!("{} {} -> {state:?}", request.method, request.path());
                            match self.refresh_access_token().await {
                                Ok(access_token) => bearer = Some(access_token),
                                Err(failure) => {
                                    state = GatewayState::Failed;
                                    warn!(
                                        "{} {} -> {state:?}: {failure}",
                                        request.method,
                                        request.path()
                                    );
                                    self.clear_session();
                                    return Err(error);
                                }
                            }
                        }
                        ErrorStep::Fail => {
                            self.notify_error(&request, &error);
                            return Err(error);
                        }
                    }
                }
            }
        }
    }

    /// Obtains a new access token, joining a refresh that is already in
    /// flight instead of starting a second one.
    pub async fn refresh_access_token(&self) -> Result<String, RefreshFailure> {
        let pending = {
            let mut slot = self.inner.pending_refresh.lock().await;
            match slot.as_ref() {
                // A finished refresh left behind by a cancelled caller is stale.
                Some(pending) if pending.peek().is_none() => pending.clone(),
                _ => {
                    let gateway = self.clone();
                    let pending = async move { gateway.perform_refresh().await }
                        .boxed()
                        .shared();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        let result = pending.clone().await;

        let mut slot = self.inner.pending_refresh.lock().await;
        if slot.as_ref().is_some_and(|current| current.ptr_eq(&pending)) {
            *slot = None;
        }
        result
    }

    async fn perform_refresh(self) -> Result<String, RefreshFailure> {
        let Some(tokens) = self.inner.session.get() else {
            return Err(RefreshFailure::NoRefreshToken);
        };
        info!("Access token expired, refreshing session");

        let request = ApiRequest::post(REFRESH_PATH)
            .json(&RefreshTokenPayload {
                refresh_token: tokens.refresh_token,
            })
            .map_err(|e| RefreshFailure::Failed(e.to_string()))?
            .quiet();
        let url = self
            .resolve(&request)
            .map_err(|e| RefreshFailure::Failed(e.to_string()))?;

        let response = self
            .execute(&request, &url, None)
            .await
            .map_err(|e| RefreshFailure::Failed(e.to_string()))?;

        let outcome = decode_outcome::<Option<RefreshResponse>>(
            &request.method,
            response.status,
            &response.body,
        )
        .map_err(|e| RefreshFailure::Failed(e.to_string()))?;

        match outcome {
            ApiOutcome::Ok {
                data: Some(refreshed),
                ..
            } => {
                self.inner
                    .session
                    .set_access_token(refreshed.access_token.clone())
                    .map_err(|e| RefreshFailure::Failed(e.to_string()))?;
                debug!("Session refreshed");
                Ok(refreshed.access_token)
            }
            ApiOutcome::Ok { data: None, .. } => Err(RefreshFailure::MissingAccessToken),
            ApiOutcome::Domain { message } => Err(RefreshFailure::Failed(message)),
            ApiOutcome::Transport { status, message } => {
                match self
                    .inner
                    .policy
                    .next_step(EndpointKind::Refresh, Some(status), 0)
                {
                    ErrorStep::ClearSession => {
                        self.clear_session();
                        Err(RefreshFailure::Revoked)
                    }
                    _ => {
                        debug!("Refresh answered {status}: {message}");
                        Err(RefreshFailure::MissingAccessToken)
                    }
                }
            }
        }
    }

    async fn execute(
        &self,
        request: &ApiRequest,
        url: &Url,
        bearer: Option<&str>,
    ) -> Result<RawResponse, reqwest::Error> {
        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), url.clone())
            .headers(request.headers.clone());
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!("{} {url} -> {status}", request.method);
        Ok(RawResponse { status, body })
    }

    fn clear_session(&self) {
        if let Err(e) = self.inner.session.clear() {
            warn!("Could not clear session: {e}");
        }
    }

    fn notify_error(&self, request: &ApiRequest, error: &GatewayError) {
        warn!("{} {} failed: {error}", request.method, request.path());
        if !request.quiet {
            self.inner
                .notifier
                .notify(Notification::error(error.user_message()));
        }
    }
}
