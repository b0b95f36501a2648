//! Single-browser tournaments.
//!
//! Four people share one screen. Nobody is authenticated, so the players
//! are plain names and the tournament is never consulted for presence.
//! Only the opening bracket is built here; advancing it belongs to the
//! client-side game loop.

use matchforge_protocol::TournamentId;
use serde::{Deserialize, Serialize};

use crate::{MatchStatus, TournamentError};

/// Request body naming the four local players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPlayers {
    pub player1: String,
    pub player2: String,
    pub player3: String,
    pub player4: String,
}

impl LocalPlayers {
    fn into_array(self) -> [String; 4] {
        [self.player1, self.player2, self.player3, self.player4]
    }
}

/// A match between two local players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalMatch {
    pub player1: String,
    pub player2: String,
    pub status: MatchStatus,
    pub winner: Option<String>,
}

/// The state sent to the browser when a local tournament is created or
/// resumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalTournamentState {
    pub id: TournamentId,
    pub players: [String; 4],
    pub round: u32,
    pub matches: Vec<LocalMatch>,
}

/// A four-player knockout held in server memory.
#[derive(Debug, Clone)]
pub struct LocalTournament {
    state: LocalTournamentState,
}

impl LocalTournament {
    /// Seeds the bracket: player 1 meets player 2, player 3 meets player 4.
    ///
    /// # Errors
    /// [`TournamentError::InvalidPlayers`] if a name is blank or two names
    /// are equal.
    pub fn new(players: LocalPlayers, id: TournamentId) -> Result<Self, TournamentError> {
        let players = players.into_array().map(|p| p.trim().to_string());

        if players.iter().any(String::is_empty) {
            return Err(TournamentError::InvalidPlayers(
                "every player needs a name".into(),
            ));
        }
        for (i, name) in players.iter().enumerate() {
            if players[i + 1..].contains(name) {
                return Err(TournamentError::InvalidPlayers(format!(
                    "duplicate player name {name:?}"
                )));
            }
        }

        let semi = |a: usize, b: usize| LocalMatch {
            player1: players[a].clone(),
            player2: players[b].clone(),
            status: MatchStatus::Pending,
            winner: None,
        };
        let matches = vec![semi(0, 1), semi(2, 3)];

        Ok(Self {
            state: LocalTournamentState {
                id,
                players,
                round: 1,
                matches,
            },
        })
    }

    pub fn id(&self) -> TournamentId {
        self.state.id
    }

    pub fn state(&self) -> &LocalTournamentState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(names: [&str; 4]) -> LocalPlayers {
        LocalPlayers {
            player1: names[0].into(),
            player2: names[1].into(),
            player3: names[2].into(),
            player4: names[3].into(),
        }
    }

    #[test]
    fn test_new_seeds_two_semi_finals() {
        let t = LocalTournament::new(players(["a", "b", "c", "d"]), TournamentId(4)).unwrap();
        let state = t.state();

        assert_eq!(t.id(), TournamentId(4));
        assert_eq!(state.round, 1);
        assert_eq!(state.matches.len(), 2);
        assert_eq!(state.matches[0].player1, "a");
        assert_eq!(state.matches[0].player2, "b");
        assert_eq!(state.matches[1].player1, "c");
        assert!(state.matches.iter().all(|m| m.status == MatchStatus::Pending));
    }

    #[test]
    fn test_rejects_blank_and_duplicate_names() {
        assert!(LocalTournament::new(players(["a", " ", "c", "d"]), TournamentId(1)).is_err());
        assert!(LocalTournament::new(players(["a", "b", "a", "d"]), TournamentId(1)).is_err());
    }

    #[test]
    fn test_state_json_shape() {
        let t = LocalTournament::new(players(["a", "b", "c", "d"]), TournamentId(9)).unwrap();
        let json = serde_json::to_value(t.state()).unwrap();

        assert_eq!(json["id"], 9);
        assert_eq!(json["players"][3], "d");
        assert_eq!(json["matches"][1]["status"], "pending");
    }
}
