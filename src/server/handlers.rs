use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::grocery::error::ApiError;
use crate::grocery::models::{parse_search_terms, LocationSummary, ProductItem};
use crate::observability::metrics::get_metrics;
use crate::server::server::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct ProductQuery {
    pub query: Option<String>,
    #[serde(rename = "locationId")]
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    #[serde(rename = "zipCode")]
    pub zip_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub message: &'static str,
    pub products: Vec<ProductItem>,
}

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub message: &'static str,
    pub location: LocationSummary,
}

/// POST /products with `{"query": "cookies, milk"}`
pub async fn post_products(State(state): State<AppState>, body: Bytes) -> Result<Json<ProductsResponse>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest("Request body is missing or empty.".to_owned()));
    }
    let request: ProductQuery = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Request body is not valid JSON: {}", e)))?;
    search_and_store(&state, request).await.map(Json)
}

/// GET /products?query=cookies,milk
pub async fn get_products(
    State(state): State<AppState>,
    Query(request): Query<ProductQuery>,
) -> Result<Json<ProductsResponse>, ApiError> {
    search_and_store(&state, request).await.map(Json)
}

/// GET /locations?zipCode=45202
pub async fn get_location(
    State(state): State<AppState>,
    Query(request): Query<LocationQuery>,
) -> Result<Json<LocationResponse>, ApiError> {
    let zip_code = request
        .zip_code
        .map(|zip| zip.trim().to_owned())
        .filter(|zip| !zip.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing 'zipCode' parameter.".to_owned()))?;

    let location = state
        .grocery
        .nearest_location(&zip_code)
        .await?
        .ok_or_else(|| ApiError::NotFound("No nearest location found for the given zip code.".to_owned()))?;

    Ok(Json(LocationResponse {
        message: "Nearest location found successfully.",
        location: location.into(),
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn search_and_store(state: &AppState, request: ProductQuery) -> Result<ProductsResponse, ApiError> {
    let raw_query = request
        .query
        .ok_or_else(|| ApiError::BadRequest("Missing 'query' parameter.".to_owned()))?;
    let terms = parse_search_terms(&raw_query);
    if terms.is_empty() {
        return Err(ApiError::BadRequest("'query' contains no search terms.".to_owned()));
    }
    let location_id = request.location_id.as_deref().filter(|id| !id.trim().is_empty());

    let metrics = get_metrics().await;
    let mut all_products = Vec::new();
    for term in &terms {
        let products = state.grocery.search_products(term, location_id, state.search_limit).await?;
        for product in products {
            let item = ProductItem::from(product);
            match state.store.put_item(&item).await {
                Ok(true) => metrics.products_stored.inc(),
                Ok(false) => debug!("skipping product without productId"),
                Err(e) => {
                    metrics.store_failures.inc();
                    return Err(e.into());
                }
            }
            all_products.push(item);
        }
    }
    info!("stored {} products for {} search terms", all_products.len(), terms.len());

    Ok(ProductsResponse {
        message: "Products fetched and stored successfully.",
        products: all_products,
    })
}
