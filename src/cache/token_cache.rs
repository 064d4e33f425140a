use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::cache::error::TokenError;
use crate::cache::token::{CachedToken, Credentials};
use crate::helpers::time::{get_instant, Clock, SystemClock};
use crate::observability::metrics::get_metrics;
use crate::sources::TokenIssuer;
use crate::utils::constants::{DEFAULT_EXCHANGE_TIMEOUT_MS, DEFAULT_SAFETY_MARGIN_SECS};

type Flight = Shared<BoxFuture<'static, Result<CachedToken, TokenError>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// subtracted from the issuer reported lifetime
    pub safety_margin_seconds: u64,
    /// upper bound for a single issuer exchange
    pub exchange_timeout: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            safety_margin_seconds: DEFAULT_SAFETY_MARGIN_SECS,
            exchange_timeout: Duration::from_millis(DEFAULT_EXCHANGE_TIMEOUT_MS),
        }
    }
}

/// Bearer token cache with single-flight refresh.
///
/// A valid token is served under a read lock. On a miss exactly one exchange
/// is started; callers arriving while it runs join it and get the same
/// outcome. The exchange runs in its own task, so it completes even if every
/// caller goes away. Errors are never cached.
pub struct TokenCache<I, C = SystemClock> {
    inner: Arc<Inner<I, C>>,
}

struct Inner<I, C> {
    issuer: I,
    clock: C,
    credentials: Credentials,
    settings: CacheSettings,
    token: RwLock<Option<CachedToken>>,
    flight: Mutex<Option<Flight>>,
}

impl<I, C> Clone for TokenCache<I, C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<I, C> fmt::Debug for TokenCache<I, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache")
            .field("credentials", &self.inner.credentials)
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}

impl<I: TokenIssuer> TokenCache<I, SystemClock> {
    pub fn with_system_clock(issuer: I, credentials: Credentials, settings: CacheSettings) -> Result<Self, TokenError> {
        Self::new(issuer, SystemClock, credentials, settings)
    }
}

impl<I: TokenIssuer, C: Clock> TokenCache<I, C> {
    /// Fails with `Configuration` when either credential is empty.
    pub fn new(issuer: I, clock: C, credentials: Credentials, settings: CacheSettings) -> Result<Self, TokenError> {
        if credentials.client_id.trim().is_empty() {
            return Err(TokenError::Configuration("client id is missing".to_owned()));
        }
        if credentials.client_secret.trim().is_empty() {
            return Err(TokenError::Configuration("client secret is missing".to_owned()));
        }
        if settings.exchange_timeout.is_zero() {
            return Err(TokenError::Configuration("exchange timeout must be greater than zero".to_owned()));
        }
        Ok(Self {
            inner: Arc::new(Inner {
                issuer,
                clock,
                credentials,
                settings,
                token: RwLock::new(None),
                flight: Mutex::new(None),
            }),
        })
    }

    /// Return the cached token while valid, otherwise exchange credentials for a new one.
    pub async fn get_token(&self) -> Result<CachedToken, TokenError> {
        if let Some(token) = self.valid_token().await {
            debug!("using cached bearer token");
            get_metrics().await.token_cache_hits.inc();
            return Ok(token);
        }

        let flight = {
            let mut slot = self.inner.flight.lock().await;
            // a refresh may have landed while we waited for the slot
            if let Some(token) = self.valid_token().await {
                get_metrics().await.token_cache_hits.inc();
                return Ok(token);
            }
            match slot.as_ref() {
                Some(flight) => {
                    debug!("joining in-flight token exchange");
                    flight.clone()
                }
                None => {
                    let flight = self.start_refresh();
                    *slot = Some(flight.clone());
                    flight
                }
            }
        };
        flight.await
    }

    /// Currently stored token, valid or not. Never triggers an exchange.
    pub async fn peek(&self) -> Option<CachedToken> {
        self.inner.token.read().await.clone()
    }

    /// Drop the stored token if it still is `value`. Returns whether it was dropped.
    pub async fn invalidate_if(&self, value: &str) -> bool {
        let mut token = self.inner.token.write().await;
        if token.as_ref().is_some_and(|t| t.value == value) {
            info!("bearer token invalidated");
            *token = None;
            return true;
        }
        false
    }

    async fn valid_token(&self) -> Option<CachedToken> {
        let now = self.inner.clock.now();
        self.inner
            .token
            .read()
            .await
            .as_ref()
            .filter(|token| token.is_valid_at(now))
            .cloned()
    }

    fn start_refresh(&self) -> Flight {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { inner.refresh().await });

        let inner = Arc::clone(&self.inner);
        async move {
            match handle.await {
                Ok(result) => result,
                Err(join_error) => {
                    error!("token refresh task failed: {}", join_error);
                    inner.flight.lock().await.take();
                    Err(TokenError::RefreshAborted(join_error.to_string()))
                }
            }
        }
        .boxed()
        .shared()
    }
}

impl<I: TokenIssuer, C: Clock> Inner<I, C> {
    async fn refresh(&self) -> Result<CachedToken, TokenError> {
        let metrics = get_metrics().await;
        let start = get_instant();
        let fetched_at = self.clock.now();
        info!("requesting new bearer token for client '{}'", self.credentials.client_id);

        let exchange = self.issuer.exchange(&self.credentials);
        let result = match tokio::time::timeout(self.settings.exchange_timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(TokenError::unavailable(format!(
                "token exchange timed out after {} ms",
                self.settings.exchange_timeout.as_millis()
            ))),
        }
        .map(|issued| CachedToken::from_issued(issued, fetched_at, self.settings.safety_margin_seconds));

        metrics.token_exchange_duration.observe(start.elapsed().as_secs_f64());
        match &result {
            Ok(token) => {
                if !token.is_valid_at(fetched_at) {
                    warn!("issuer lifetime does not exceed the safety margin; token expires immediately");
                }
                metrics.token_exchanges.with_label_values(&["success"]).inc();
                metrics.token_expiry_unix.set(token.expires_at.timestamp());
                *self.token.write().await = Some(token.clone());
                info!("obtained new bearer token, valid until {}", token.expires_at);
            }
            Err(err) => {
                metrics.token_exchanges.with_label_values(&[err.kind()]).inc();
                error!("error getting bearer token: {}", err);
            }
        }

        self.flight.lock().await.take();
        result
    }
}
