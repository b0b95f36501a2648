//! Core types shared by every Matchforge layer.
//!
//! Everything here either identifies something (a game, a tournament, a
//! player) or travels to a client inside a JSON reply. The serde attributes
//! are part of the contract: the browser client reads these exact shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Numeric identifier of a game session (a room).
///
/// Ids are supplied by the caller that creates the room and are unique
/// within one partition only: a remote room and a custom room may share
/// the same `GameId`.
///
/// `#[serde(transparent)]` serializes `GameId(7)` as plain `7`, which is
/// what the client expects in the `id` field of a reply.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

/// Parses the decimal form used in URL paths and the `localGameId` cookie.
impl FromStr for GameId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(GameId).map_err(|_| {
            ProtocolError::InvalidMessage(format!("invalid game id: {s:?}"))
        })
    }
}

/// Numeric identifier of a tournament, local or remote.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TournamentId(pub u64);

impl fmt::Display for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T-{}", self.0)
    }
}

/// The authentication-level identifier of a player (their username).
///
/// This is the *stored identity* used for every activity check. It is
/// deliberately a different type from a display name: two players may
/// share a nickname, but never an identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerIdentity(String);

impl PlayerIdentity {
    /// Wraps a username.
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for an unset identity. Empty identities are never
    /// considered active and never match a room slot.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerIdentity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// An authenticated player: their stored identity plus the name shown in
/// the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub identity: PlayerIdentity,
    pub display_name: String,
}

impl Player {
    /// Creates a player whose display name equals their identity.
    pub fn named(identity: &str) -> Self {
        Self {
            identity: PlayerIdentity::new(identity),
            display_name: identity.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session enums
// ---------------------------------------------------------------------------

/// Which kind of session a room belongs to. Each kind lives in its own
/// registry partition.
///
/// - **Remote**: two authenticated players matched by the server.
/// - **Custom**: an invite from one authenticated player to another.
/// - **Local**: several players sharing one browser; no identity involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Remote,
    Custom,
    Local,
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Custom => write!(f, "custom"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// The side of the table a player occupies. Slot 1 is always `Left`,
/// slot 2 is always `Right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Why a custom game was cancelled.
///
/// The reason is forwarded to the room so the client can show a message.
/// The server never branches on it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    #[default]
    InviteDeclined,
    Timeout,
    OpponentLeft,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InviteDeclined => write!(f, "invite_declined"),
            Self::Timeout => write!(f, "timeout"),
            Self::OpponentLeft => write!(f, "opponent_left"),
        }
    }
}

impl FromStr for CancelReason {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invite_declined" => Ok(Self::InviteDeclined),
            "timeout" => Ok(Self::Timeout),
            "opponent_left" => Ok(Self::OpponentLeft),
            other => Err(ProtocolError::InvalidMessage(format!(
                "unknown cancel reason: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

/// The `state` field of a successful session reply.
///
/// The odd casing of `"Created"` is part of the client contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplyState {
    #[serde(rename = "joined")]
    Joined,
    #[serde(rename = "enter")]
    Enter,
    #[serde(rename = "Created")]
    Created,
}

/// Successful reply to a session request.
///
/// ```json
/// { "state": "joined", "side": "right", "gameMode": "remote", "name": "bob", "id": 7 }
/// ```
///
/// `side` and `name` are omitted for session kinds that have no seat
/// (custom invites, local games).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReply {
    pub state: ReplyState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub game_mode: GameType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub id: GameId,
}

/// The `state` field of a conflict reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictState {
    /// A player is already in an active session.
    Busy,
    /// The requested id is already taken.
    Conflict,
}

/// Body sent with HTTP 409.
///
/// ```json
/// { "state": "busy", "message": "Player is already participating in a game." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReply {
    pub state: ConflictState,
    pub message: String,
}

impl ConflictReply {
    pub fn busy(message: impl Into<String>) -> Self {
        Self {
            state: ConflictState::Busy,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            state: ConflictState::Conflict,
            message: message.into(),
        }
    }
}

/// Body sent with any other non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub message: String,
}

/// Reply to a cancel request. `cancelled` is `false` when the room did not
/// exist (or was already gone).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelReply {
    pub cancelled: bool,
}

// =========================================================================
// Tests
// =========================================================================
