//! Credential-to-client port.

use url::Url;

use crate::domain::{AccessToken, AppError};
use crate::ports::RepositoryApi;

/// Builds authenticated API clients and drives the OAuth2 authorization-code flow.
///
/// One client is built per logical operation and never shared across tokens.
/// Building does not validate the token; a bad credential surfaces as a failed
/// remote call.
pub trait ClientBuilder {
    fn build(&self, token: &AccessToken) -> Box<dyn RepositoryApi>;

    /// URL the user is redirected to in order to grant access. `state` is echoed
    /// back on the callback for CSRF protection.
    fn authorization_url(&self, state: &str) -> Url;

    /// Exchange an authorization code for an access token.
    fn exchange_code(&self, code: &str) -> Result<AccessToken, AppError>;
}
