//! Authentication hook for identifying players.
//!
//! Matchforge doesn't issue or verify credentials itself. The server reads
//! the bearer token from each authenticated request and hands it to your
//! [`Authenticator`], which returns the player's stored identity and the
//! name to show in the UI.
//!
//! Local games and tournaments never call the authenticator: they are tied
//! to a browser cookie, not to a player.

use axum::http::{HeaderMap, header};
use matchforge_protocol::Player;

use crate::AuthError;

/// Validates a client's token and returns who they are.
///
/// # Example
///
/// ```rust
/// use matchforge::{AuthError, Authenticator};
/// use matchforge_protocol::Player;
///
/// /// Treats the token as the username. Development only.
/// struct DevAuthenticator;
///
/// impl Authenticator for DevAuthenticator {
///     async fn authenticate(&self, token: &str) -> Result<Player, AuthError> {
///         if token.is_empty() {
///             return Err(AuthError::Rejected("empty token".into()));
///         }
///         Ok(Player::named(token))
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Validates `token` and returns the player it belongs to.
    ///
    /// The returned [`Player::identity`] is what every activity check
    /// compares against, so it must be stable for a given account.
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Player, AuthError>> + Send;
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::Rejected("authorization header is not ASCII".into()))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)
}
