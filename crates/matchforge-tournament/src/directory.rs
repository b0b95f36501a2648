//! The read-only contract the lobby consumes.

use matchforge_protocol::{PlayerIdentity, TournamentId};
use serde::{Deserialize, Serialize};

/// Status of a single tournament match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    InProgress,
    Complete,
}

/// A pairing inside a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub player1: PlayerIdentity,
    pub player2: PlayerIdentity,
    pub status: MatchStatus,
}

impl Match {
    pub fn new(player1: PlayerIdentity, player2: PlayerIdentity) -> Self {
        Self {
            player1,
            player2,
            status: MatchStatus::Pending,
        }
    }

    /// Returns `true` if `identity` plays in this match.
    pub fn involves(&self, identity: &PlayerIdentity) -> bool {
        self.player1 == *identity || self.player2 == *identity
    }
}

/// Narrow query interface onto the tournament subsystem.
///
/// Implementations answer from their own current state on every call;
/// callers must not cache the answers, since matches start and finish
/// between requests.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` → one directory is shared by every request
///   handler for the lifetime of the server.
pub trait TournamentDirectory: Send + Sync + 'static {
    /// Returns the tournament `identity` is entered in, if any.
    fn player_tournament(&self, identity: &PlayerIdentity) -> Option<TournamentId>;

    /// Returns the next match `identity` has to play in `tournament`.
    fn next_match(
        &self,
        tournament: TournamentId,
        identity: &PlayerIdentity,
    ) -> Option<Match>;
}

/// A server without tournaments.
impl TournamentDirectory for () {
    fn player_tournament(&self, _identity: &PlayerIdentity) -> Option<TournamentId> {
        None
    }

    fn next_match(
        &self,
        _tournament: TournamentId,
        _identity: &PlayerIdentity,
    ) -> Option<Match> {
        None
    }
}
