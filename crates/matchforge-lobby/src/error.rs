//! Error types for the lobby layer.
//!
//! Every variant is an expected business outcome, not a fault. Each one has
//! a fixed resolution:
//!
//! | variant | policy |
//! |---|---|
//! | `AlreadyActive` | reject; the caller answers 409 "busy" |
//! | `RoomNotFound` | sentinel; nothing to reconnect to or finish |
//! | `NoOpenRoom` | sentinel; the caller falls back to creating a room |
//! | `DuplicateRoomId` | reject; existing rooms are never overwritten |

use matchforge_protocol::{GameType, PlayerIdentity};
use matchforge_tournament::TournamentError;

/// Whose activity blocked the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The player asking to join or create a remote game.
    Player,
    /// The player sending a custom invite.
    Inviter,
    /// The player receiving a custom invite.
    Invitee,
}

impl Role {
    /// Client-facing message for a busy conflict.
    pub fn busy_message(self) -> &'static str {
        match self {
            Self::Player => "Player is already participating in a game.",
            Self::Inviter => "You are already participating in a game.",
            Self::Invitee => "The invited player is already participating in a game.",
        }
    }
}

/// Errors returned by [`Matchmaker`](crate::Matchmaker) operations.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// The player is already in an active room or a live tournament match.
    #[error("{}", .role.busy_message())]
    AlreadyActive {
        identity: PlayerIdentity,
        role: Role,
    },

    /// No room matched the lookup.
    #[error("no {game_type} room found for {target}")]
    RoomNotFound { game_type: GameType, target: String },

    /// Every remote room already has two players.
    #[error("no open room available")]
    NoOpenRoom,

    /// The id is already registered in the target partition.
    #[error("{kind} id {id} is already in use")]
    DuplicateRoomId { kind: String, id: String },

    /// A local tournament could not be built.
    #[error(transparent)]
    Tournament(#[from] TournamentError),
}
