//! In-memory tournament directory.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use matchforge_protocol::{PlayerIdentity, TournamentId};

use crate::{Match, MatchStatus, TournamentDirectory, TournamentError};

#[derive(Default)]
struct BoardInner {
    /// Matches per tournament, in bracket order.
    tournaments: HashMap<TournamentId, Vec<Match>>,
    /// Which tournament each player is entered in.
    entrants: HashMap<PlayerIdentity, TournamentId>,
}

/// Tournaments kept in server memory.
///
/// The bracket runner registers tournaments and updates match statuses;
/// the lobby reads through [`TournamentDirectory`]. Interior locking lets
/// both sides share one `Arc<TournamentBoard>`.
#[derive(Default)]
pub struct TournamentBoard {
    inner: RwLock<BoardInner>,
}

impl TournamentBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tournament with its matches. Every player named in a
    /// match becomes an entrant.
    ///
    /// # Errors
    /// - [`TournamentError::Duplicate`] if `id` is already registered
    /// - [`TournamentError::AlreadyEntered`] if a player is entered elsewhere
    pub fn register(
        &self,
        id: TournamentId,
        matches: Vec<Match>,
    ) -> Result<(), TournamentError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.tournaments.contains_key(&id) {
            return Err(TournamentError::Duplicate(id));
        }
        for m in &matches {
            for p in [&m.player1, &m.player2] {
                if let Some(other) = inner.entrants.get(p) {
                    return Err(TournamentError::AlreadyEntered(p.clone(), *other));
                }
            }
        }
        for m in &matches {
            inner.entrants.insert(m.player1.clone(), id);
            inner.entrants.insert(m.player2.clone(), id);
        }
        tracing::info!(tournament_id = %id, matches = matches.len(), "tournament registered");
        inner.tournaments.insert(id, matches);
        Ok(())
    }

    /// Updates the status of the match between `a` and `b`.
    pub fn set_match_status(
        &self,
        id: TournamentId,
        a: &PlayerIdentity,
        b: &PlayerIdentity,
        status: MatchStatus,
    ) -> Result<(), TournamentError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let matches = inner
            .tournaments
            .get_mut(&id)
            .ok_or(TournamentError::NotFound(id))?;
        let m = matches
            .iter_mut()
            .find(|m| m.involves(a) && m.involves(b))
            .ok_or_else(|| TournamentError::NoSuchMatch(a.clone(), b.clone()))?;
        m.status = status;
        tracing::debug!(tournament_id = %id, player1 = %a, player2 = %b, ?status, "match status updated");
        Ok(())
    }

    /// Removes a finished tournament and releases its entrants.
    pub fn remove(&self, id: TournamentId) -> Result<(), TournamentError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner
            .tournaments
            .remove(&id)
            .ok_or(TournamentError::NotFound(id))?;
        inner.entrants.retain(|_, t| *t != id);
        tracing::info!(tournament_id = %id, "tournament removed");
        Ok(())
    }
}

impl TournamentDirectory for TournamentBoard {
    fn player_tournament(&self, identity: &PlayerIdentity) -> Option<TournamentId> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entrants.get(identity).copied()
    }

    /// The next match is the first one in bracket order that involves the
    /// player and is not yet complete.
    fn next_match(
        &self,
        tournament: TournamentId,
        identity: &PlayerIdentity,
    ) -> Option<Match> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .tournaments
            .get(&tournament)?
            .iter()
            .find(|m| m.involves(identity) && m.status != MatchStatus::Complete)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> PlayerIdentity {
        PlayerIdentity::new(s)
    }

    fn semi_finals() -> Vec<Match> {
        vec![
            Match::new(id("alice"), id("bob")),
            Match::new(id("carol"), id("dave")),
        ]
    }

    #[test]
    fn test_register_indexes_entrants() {
        let board = TournamentBoard::new();
        board.register(TournamentId(1), semi_finals()).unwrap();

        assert_eq!(board.player_tournament(&id("carol")), Some(TournamentId(1)));
        assert_eq!(board.player_tournament(&id("erin")), None);
    }

    #[test]
    fn test_player_cannot_enter_two_tournaments() {
        let board = TournamentBoard::new();
        board.register(TournamentId(1), semi_finals()).unwrap();

        let err = board
            .register(TournamentId(2), vec![Match::new(id("alice"), id("erin"))])
            .unwrap_err();
        assert!(matches!(err, TournamentError::AlreadyEntered(_, TournamentId(1))));
        assert_eq!(board.player_tournament(&id("erin")), None);
    }

    #[test]
    fn test_next_match_skips_completed() {
        let board = TournamentBoard::new();
        let mut matches = semi_finals();
        matches.push(Match::new(id("alice"), id("carol")));
        board.register(TournamentId(1), matches).unwrap();

        board
            .set_match_status(TournamentId(1), &id("alice"), &id("bob"), MatchStatus::Complete)
            .unwrap();

        let next = board.next_match(TournamentId(1), &id("alice")).unwrap();
        assert!(next.involves(&id("carol")));
        assert_eq!(next.status, MatchStatus::Pending);
        assert_eq!(board.next_match(TournamentId(1), &id("bob")), None);
    }

    #[test]
    fn test_set_status_unknown_match() {
        let board = TournamentBoard::new();
        board.register(TournamentId(1), semi_finals()).unwrap();
        let err = board
            .set_match_status(TournamentId(1), &id("alice"), &id("dave"), MatchStatus::InProgress)
            .unwrap_err();
        assert!(matches!(err, TournamentError::NoSuchMatch(_, _)));
    }

    #[test]
    fn test_remove_releases_entrants() {
        let board = TournamentBoard::new();
        board.register(TournamentId(1), semi_finals()).unwrap();
        board.remove(TournamentId(1)).unwrap();

        assert_eq!(board.player_tournament(&id("alice")), None);
        assert!(board.remove(TournamentId(1)).is_err());
    }
}
