/// Sources module
///
/// Token issuers the cache can exchange credentials with.

use std::future::Future;

use crate::cache::error::TokenError;
use crate::cache::token::{Credentials, IssuedToken};

pub mod oauth2;

pub use oauth2::ClientCredentialsIssuer;

pub trait TokenIssuer: Send + Sync + 'static {
    /// Exchange client credentials for a token and its lifetime.
    fn exchange(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<IssuedToken, TokenError>> + Send;
}
