use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ================================
/// Grocery API payloads (only the fields we reshape)
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProductSearchResponse {
    #[serde(default)]
    pub data: Vec<ApiProduct>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiProduct {
    pub product_id: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    #[serde(default)]
    pub items: Vec<ApiItem>,
    #[serde(default)]
    pub images: Vec<ApiImage>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ApiItem {
    /// kept as-is, the API nests regular and promo prices
    pub price: Option<Value>,
    pub fulfillment: Option<ApiFulfillment>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ApiFulfillment {
    pub store: Option<ApiStore>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ApiStore {
    pub id: Option<Value>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ApiImage {
    #[serde(default)]
    pub sizes: Vec<ApiImageSize>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ApiImageSize {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LocationSearchResponse {
    #[serde(default)]
    pub data: Vec<ApiLocation>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiLocation {
    pub location_id: Option<String>,
    pub name: Option<String>,
    pub address: Option<ApiAddress>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiAddress {
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// ================================
/// Reshaped rows
/// ================================

/// One stored product row.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductItem {
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub price: Option<Value>,
    pub image_url: Option<String>,
    pub store_id: Option<Value>,
}

impl From<ApiProduct> for ProductItem {
    fn from(product: ApiProduct) -> Self {
        let first_item = product.items.into_iter().next();
        let image_url = product
            .images
            .into_iter()
            .next()
            .and_then(|image| image.sizes.into_iter().next())
            .and_then(|size| size.url);
        let (price, store_id) = match first_item {
            Some(item) => (
                item.price,
                item.fulfillment.and_then(|f| f.store).and_then(|s| s.id),
            ),
            None => (None, None),
        };

        Self {
            product_id: product.product_id,
            name: product.description,
            brand: product.brand,
            price,
            image_url,
            store_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl From<ApiLocation> for LocationSummary {
    fn from(location: ApiLocation) -> Self {
        let address = location.address.unwrap_or_default();
        Self {
            id: location.location_id,
            name: location.name,
            address: address.address_line1,
            city: address.city,
            state: address.state,
            zip_code: address.zip_code,
        }
    }
}

/// `"cookies, milk"` -> `["cookies", "milk"]`
pub fn parse_search_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_owned)
        .collect()
}
