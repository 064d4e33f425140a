//! Grocery API plumbing: the search client, its payloads and the reshaped rows.

pub mod client;
pub mod error;
pub mod models;

pub use client::GroceryClient;
pub use error::ApiError;
