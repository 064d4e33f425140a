use std::time::Duration;

use http::header::{ACCEPT, AUTHORIZATION};
use http::StatusCode;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::cache::error::TokenError;
use crate::cache::token_cache::TokenCache;
use crate::config::types::ApiConfig;
use crate::grocery::error::ApiError;
use crate::grocery::models::{ApiLocation, ApiProduct, LocationSearchResponse, ProductSearchResponse};
use crate::helpers::time::{get_instant, Clock, SystemClock};
use crate::observability::metrics::get_metrics;
use crate::sources::TokenIssuer;
use crate::utils::constants::{ENDPOINT_LOCATIONS, ENDPOINT_PRODUCTS};

/// Product and location search against the grocery API, authenticated with
/// bearer tokens from the shared [`TokenCache`].
#[derive(Debug)]
pub struct GroceryClient<I, C = SystemClock> {
    http: Client,
    product_url: String,
    location_url: String,
    tokens: TokenCache<I, C>,
}

impl<I: TokenIssuer, C: Clock> GroceryClient<I, C> {
    pub fn new(api: &ApiConfig, tokens: TokenCache<I, C>) -> Result<Self, TokenError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(api.timeout_ms))
            .build()
            .map_err(|e| TokenError::Configuration(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(http, api, tokens))
    }

    pub fn with_client(http: Client, api: &ApiConfig, tokens: TokenCache<I, C>) -> Self {
        Self {
            http,
            product_url: api.product_url.clone(),
            location_url: api.location_url.clone(),
            tokens,
        }
    }

    pub async fn search_products(
        &self,
        term: &str,
        location_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<ApiProduct>, ApiError> {
        let mut query = vec![
            ("filter.term", term.to_owned()),
            ("filter.limit", limit.to_string()),
        ];
        if let Some(location_id) = location_id {
            query.push(("filter.locationId", location_id.to_owned()));
        }

        let response: ProductSearchResponse = self.get_json(ENDPOINT_PRODUCTS, &self.product_url, &query).await?;
        info!("product search '{}' returned {} products", term, response.data.len());
        Ok(response.data)
    }

    /// First location near `zip_code`, if any.
    pub async fn nearest_location(&self, zip_code: &str) -> Result<Option<ApiLocation>, ApiError> {
        let query = [("filter.zipCode.near", zip_code.to_owned())];
        let response: LocationSearchResponse = self.get_json(ENDPOINT_LOCATIONS, &self.location_url, &query).await?;
        debug!("location search '{}' returned {} locations", zip_code, response.data.len());
        Ok(response.data.into_iter().next())
    }

    /// GET with a bearer token. A 401 invalidates the token and retries once.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let metrics = get_metrics().await;
        let start = get_instant();
        let mut retried = false;

        let result = loop {
            let token = self.tokens.get_token().await?;
            let response = self
                .http
                .get(url)
                .header(AUTHORIZATION, token.bearer())
                .header(ACCEPT, "application/json")
                .query(query)
                .send()
                .await;

            let response = match response {
                Ok(response) => response,
                Err(e) => {
                    error!("error calling grocery api '{}': {}", endpoint, e);
                    break Err(ApiError::UpstreamUnavailable(e));
                }
            };

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED && !retried {
                warn!("grocery api '{}' rejected the bearer token, refreshing", endpoint);
                self.tokens.invalidate_if(&token.value).await;
                retried = true;
                continue;
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                error!("grocery api '{}' failed: {}", endpoint, status);
                break Err(ApiError::UpstreamRejected { status: status.as_u16(), body });
            }

            break match response.text().await {
                Ok(body) => serde_json::from_str::<T>(&body).map_err(|e| ApiError::UpstreamMalformed(e.to_string())),
                Err(e) => Err(ApiError::UpstreamUnavailable(e)),
            };
        };

        metrics.upstream_duration.with_label_values(&[endpoint]).observe(start.elapsed().as_secs_f64());
        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics.upstream_requests.with_label_values(&[endpoint, outcome]).inc();
        result
    }
}
