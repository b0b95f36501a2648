//! Room configuration and the game-state snapshot.

use matchforge_protocol::{CancelReason, GameType, Side};
use serde::{Deserialize, Serialize};

use crate::CloseNotifier;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration handed to a room at construction.
///
/// `on_terminate` is the room's only way back to its partition: the room
/// reports its own termination through it, and the registry does the
/// removal.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// The partition this room belongs to.
    pub game_type: GameType,

    /// Where the room reports its termination.
    pub on_terminate: CloseNotifier,
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// The lifecycle status of a game.
///
/// ```text
/// Waiting → InProgress → Finished
///    │           │
///    └───────────┴──────→ Cancelled
/// ```
///
/// - **Waiting**: the room exists but play has not started (an open remote
///   room, or a custom invite not yet played).
/// - **InProgress**: both seats are taken and the game is running.
/// - **Finished**: a winner was recorded.
/// - **Cancelled**: the room was cancelled or abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    InProgress,
    Finished,
    Cancelled,
}

impl GameStatus {
    /// Returns `true` once no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }

    /// Returns `true` if moving to `target` is a legal transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        match (self, target) {
            (Self::Waiting, Self::InProgress) => true,
            (Self::Waiting | Self::InProgress, Self::Cancelled) => true,
            (Self::Waiting | Self::InProgress, Self::Finished) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Finished => write!(f, "finished"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Points per side plus the winner, once there is one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub left: u32,
    pub right: u32,
    pub winner: Option<Side>,
}

/// Snapshot of a game as seen by the session layer.
///
/// The state exists from the moment a room is constructed, so a player
/// waiting alone in an open room already counts as active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    pub score: Score,
    /// Set when the room was cancelled with a reason.
    pub cancel_reason: Option<CancelReason>,
}

impl GameState {
    /// A fresh game waiting to start.
    pub fn waiting() -> Self {
        Self {
            status: GameStatus::Waiting,
            score: Score::default(),
            cancel_reason: None,
        }
    }

    /// A game is active while it is not cancelled and nobody has won.
    pub fn is_active(&self) -> bool {
        self.status != GameStatus::Cancelled && self.score.winner.is_none()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::waiting()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_status_transitions() {
        assert!(GameStatus::Waiting.can_transition_to(GameStatus::InProgress));
        assert!(GameStatus::Waiting.can_transition_to(GameStatus::Cancelled));
        assert!(GameStatus::InProgress.can_transition_to(GameStatus::Finished));
        assert!(!GameStatus::InProgress.can_transition_to(GameStatus::Waiting));
        assert!(!GameStatus::Cancelled.can_transition_to(GameStatus::InProgress));
        assert!(!GameStatus::Finished.can_transition_to(GameStatus::Cancelled));
    }

    #[test]
    fn test_game_status_is_terminal() {
        assert!(!GameStatus::Waiting.is_terminal());
        assert!(!GameStatus::InProgress.is_terminal());
        assert!(GameStatus::Finished.is_terminal());
        assert!(GameStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_game_status_display() {
        assert_eq!(GameStatus::InProgress.to_string(), "in_progress");
        assert_eq!(GameStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_game_state_activity() {
        let mut state = GameState::waiting();
        assert!(state.is_active());

        state.status = GameStatus::InProgress;
        assert!(state.is_active());

        state.score.winner = Some(Side::Left);
        assert!(!state.is_active(), "a recorded winner ends activity");

        let cancelled = GameState {
            status: GameStatus::Cancelled,
            ..GameState::waiting()
        };
        assert!(!cancelled.is_active());
    }
}
