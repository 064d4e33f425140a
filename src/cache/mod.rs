pub mod error;
pub mod token;
pub mod token_cache;

pub use error::TokenError;
pub use token::{CachedToken, Credentials, IssuedToken};
pub use token_cache::{CacheSettings, TokenCache};
