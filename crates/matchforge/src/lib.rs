//! # Matchforge
//!
//! Matchmaking and game-room lifecycle service for web games.
//!
//! Matchforge seats authenticated players into remote rooms, creates
//! invite-only custom games, and hosts shared-screen local games and
//! tournaments. It guarantees that no player holds more than one active
//! session at a time, counting live tournament matches supplied by your
//! [`TournamentDirectory`](matchforge_tournament::TournamentDirectory).
//!
//! Game simulation is not part of this crate. The game layer reports
//! results back over HTTP (`POST /games/{remote,custom}/{id}/result` and
//! `DELETE /games/remote/{id}`), which end the room through
//! [`Matchmaker::record_win`](matchforge_lobby::Matchmaker::record_win) and
//! [`Matchmaker::abandon`](matchforge_lobby::Matchmaker::abandon) and free
//! both players.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use matchforge::prelude::*;
//!
//! struct TokenIsName;
//!
//! impl Authenticator for TokenIsName {
//!     async fn authenticate(&self, token: &str) -> Result<Player, AuthError> {
//!         Ok(Player::named(token))
//!     }
//! }
//!
//! # async fn start() -> Result<(), MatchforgeError> {
//! let server = MatchforgeServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build(TokenIsName, Arc::new(TournamentBoard::new()))
//!     .await?;
//! server.run().await
//! # }
//! ```

mod auth;
mod cookie;
mod error;
mod handler;
mod server;

pub use auth::Authenticator;
pub use cookie::{CookiePolicy, LOCAL_GAME_COOKIE, LOCAL_TOURNAMENT_COOKIE, SameSite};
pub use error::{AuthError, MatchforgeError};
pub use server::{MatchforgeServer, MatchforgeServerBuilder};

/// Installs a `tracing` subscriber that honours `RUST_LOG`, defaulting to
/// `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Everything needed to stand up a server.
pub mod prelude {
    pub use crate::{
        AuthError, Authenticator, CookiePolicy, LOCAL_GAME_COOKIE, LOCAL_TOURNAMENT_COOKIE,
        MatchforgeError, MatchforgeServer, MatchforgeServerBuilder, SameSite,
    };
    pub use matchforge_lobby::{LobbyError, Matchmaker, Seat};
    pub use matchforge_protocol::{
        CancelReason, GameId, GameType, Player, PlayerIdentity, Side, TournamentId,
    };
    pub use matchforge_tournament::{Match, MatchStatus, TournamentBoard, TournamentDirectory};
}
