//! Error types for the tournament layer.

use matchforge_protocol::{PlayerIdentity, TournamentId};

/// Errors raised while registering or updating tournaments.
#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    /// A tournament with this id is already on the board.
    #[error("tournament {0} already exists")]
    Duplicate(TournamentId),

    /// No tournament with this id.
    #[error("tournament {0} not found")]
    NotFound(TournamentId),

    /// A player may be entered in one tournament at a time.
    #[error("player {0} is already entered in tournament {1}")]
    AlreadyEntered(PlayerIdentity, TournamentId),

    /// The tournament has no match between these two players.
    #[error("no match between {0} and {1}")]
    NoSuchMatch(PlayerIdentity, PlayerIdentity),

    /// Local tournament players must be named and distinct.
    #[error("invalid players: {0}")]
    InvalidPlayers(String),
}
