use std::sync::Arc;

use matchforge::prelude::*;

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Treats the bearer token as the username. Development only: anyone can
/// claim any name.
struct UsernameAuth;

impl Authenticator for UsernameAuth {
    async fn authenticate(&self, token: &str) -> Result<Player, AuthError> {
        let valid = token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if token.is_empty() || token.len() > 32 || !valid {
            return Err(AuthError::Rejected(
                "token must be 1-32 letters, digits, '_' or '-'".into(),
            ));
        }
        Ok(Player::named(token))
    }
}

// ---------------------------------------------------------------------------
// Server bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), MatchforgeError> {
    matchforge::init_tracing();

    let addr = std::env::var("MATCHFORGE_BIND").unwrap_or_else(|_| "127.0.0.1:8080".into());
    let tournaments = Arc::new(TournamentBoard::new());

    let server = MatchforgeServer::builder()
        .bind(&addr)
        .build(UsernameAuth, tournaments)
        .await?;
    tracing::info!(addr = %server.local_addr()?, "pong lobby listening");

    server.run().await
}
