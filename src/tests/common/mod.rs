// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Client;

use crate::cache::error::TokenError;
use crate::cache::token::{Credentials, IssuedToken};
use crate::cache::token_cache::{CacheSettings, TokenCache};
use crate::helpers::time::ManualClock;
use crate::sources::TokenIssuer;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn issued(access_token: &str, expires_in: i64) -> Result<IssuedToken, TokenError> {
    Ok(IssuedToken { access_token: access_token.to_owned(), expires_in })
}

pub fn credentials() -> Credentials {
    Credentials::new("id1", "secret1")
}

pub fn settings(safety_margin_seconds: u64) -> CacheSettings {
    CacheSettings { safety_margin_seconds, exchange_timeout: Duration::from_secs(5) }
}

/// Issuer answering from a fixed script, counting exchanges.
#[derive(Clone, Default)]
pub struct ScriptedIssuer {
    calls: Arc<AtomicUsize>,
    responses: Arc<Mutex<VecDeque<Result<IssuedToken, TokenError>>>>,
    delay: Duration,
}

impl ScriptedIssuer {
    pub fn new(responses: Vec<Result<IssuedToken, TokenError>>) -> Self {
        Self { responses: Arc::new(Mutex::new(responses.into())), ..Default::default() }
    }

    /// every exchange sleeps `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenIssuer for ScriptedIssuer {
    async fn exchange(&self, _credentials: &Credentials) -> Result<IssuedToken, TokenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(TokenError::unavailable("no scripted response left")))
    }
}

pub fn scripted_cache(
    issuer: &ScriptedIssuer,
    clock: &ManualClock,
    safety_margin_seconds: u64,
) -> TokenCache<ScriptedIssuer, ManualClock> {
    TokenCache::new(issuer.clone(), clock.clone(), credentials(), settings(safety_margin_seconds)).unwrap()
}
