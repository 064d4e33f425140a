//! Shared defaults and labels

pub const DEFAULT_SAFETY_MARGIN_SECS: u64 = 60;
pub const DEFAULT_EXCHANGE_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_API_TIMEOUT_MS: u64 = 10000;
pub const DEFAULT_SCOPE: &str = "product.compact";
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

// Grocery API endpoint labels
pub const ENDPOINT_PRODUCTS: &str = "products";
pub const ENDPOINT_LOCATIONS: &str = "locations";
