//! Game rooms and their termination events.
//!
//! A room never removes itself from the registry. When it reaches a
//! terminal condition it sends a [`RoomClosed`] event through its
//! [`CloseNotifier`]; the registry drains those events and reclaims the id.
//! The `closed` latch guarantees the event is sent at most once.

use matchforge_protocol::{
    CancelReason, GameId, GameType, Player, PlayerIdentity, Side,
};
use tokio::sync::mpsc;

use crate::{GameState, GameStatus, RoomConfig, RoomError};

// ---------------------------------------------------------------------------
// Termination events
// ---------------------------------------------------------------------------

/// What ended a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationCause {
    /// Explicitly cancelled, with the reason shown to the clients.
    Cancelled(CancelReason),
    /// A winner was recorded.
    Won(Side),
    /// A player walked away from a running game.
    Abandoned,
}

/// Emitted once by a room when it terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomClosed {
    pub game_type: GameType,
    pub game_id: GameId,
    pub cause: TerminationCause,
}

/// Sender half of the registry's termination channel.
///
/// Cheap to clone; every room holds one.
#[derive(Debug, Clone)]
pub struct CloseNotifier {
    sender: mpsc::UnboundedSender<RoomClosed>,
}

impl CloseNotifier {
    pub(crate) fn new(sender: mpsc::UnboundedSender<RoomClosed>) -> Self {
        Self { sender }
    }

    fn notify(&self, event: RoomClosed) {
        let game_id = event.game_id;
        if self.sender.send(event).is_err() {
            // Registry is gone; nobody is left to reclaim the id.
            tracing::warn!(%game_id, "room closed after registry shutdown");
        }
    }
}

// ---------------------------------------------------------------------------
// GameRoom
// ---------------------------------------------------------------------------

/// A player seated in a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    /// Stored identity, used for every activity and reconnection match.
    pub identity: PlayerIdentity,
    /// Name shown to the opponent.
    pub display_name: String,
}

impl From<&Player> for Occupant {
    fn from(player: &Player) -> Self {
        Self {
            identity: player.identity.clone(),
            display_name: player.display_name.clone(),
        }
    }
}

/// A remote or custom game room with two slots.
///
/// The first occupant is supplied at construction. The second arrives
/// later through [`seat_opponent`](Self::seat_opponent) (remote rooms) or
/// is known up front (custom invites, via
/// [`with_opponent`](Self::with_opponent)).
#[derive(Debug)]
pub struct GameRoom {
    id: GameId,
    game_type: GameType,
    player1: Occupant,
    player2: Option<Occupant>,
    game_state: GameState,
    on_terminate: CloseNotifier,
    closed: bool,
}

impl GameRoom {
    /// Creates a room with only the first slot filled.
    pub fn new(id: GameId, first: &Player, config: RoomConfig) -> Self {
        Self {
            id,
            game_type: config.game_type,
            player1: Occupant::from(first),
            player2: None,
            game_state: GameState::waiting(),
            on_terminate: config.on_terminate,
            closed: false,
        }
    }

    /// Creates a room with both slots filled. The game stays `Waiting`
    /// until it is actually played.
    pub fn with_opponent(
        id: GameId,
        first: &Player,
        second: &Player,
        config: RoomConfig,
    ) -> Self {
        let mut room = Self::new(id, first, config);
        room.player2 = Some(Occupant::from(second));
        room
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    pub fn player1(&self) -> &Occupant {
        &self.player1
    }

    pub fn player2(&self) -> Option<&Occupant> {
        self.player2.as_ref()
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    /// Returns `true` if the second slot is still empty.
    pub fn is_open(&self) -> bool {
        self.player2.is_none()
    }

    /// Returns `true` while the game state is neither cancelled nor won.
    pub fn is_active(&self) -> bool {
        self.game_state.is_active()
    }

    /// Returns `true` once the termination event has been sent.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the side `identity` is seated on, if any. An empty identity
    /// never matches.
    pub fn side_of(&self, identity: &PlayerIdentity) -> Option<Side> {
        if identity.is_empty() {
            return None;
        }
        if self.player1.identity == *identity {
            return Some(Side::Left);
        }
        match &self.player2 {
            Some(p2) if p2.identity == *identity => Some(Side::Right),
            _ => None,
        }
    }

    /// Fills the second slot and starts the game.
    ///
    /// # Errors
    /// [`RoomError::SlotTaken`] if the slot is already filled.
    pub fn seat_opponent(&mut self, player: &Player) -> Result<(), RoomError> {
        if self.player2.is_some() {
            return Err(RoomError::SlotTaken(self.id));
        }
        self.player2 = Some(Occupant::from(player));
        if self.game_state.status.can_transition_to(GameStatus::InProgress) {
            self.game_state.status = GameStatus::InProgress;
        }
        tracing::info!(
            game_id = %self.id,
            identity = %player.identity,
            "opponent seated"
        );
        Ok(())
    }

    /// Cancels the game. Returns `false` if the room had already terminated.
    pub fn cancel(&mut self, reason: CancelReason) -> bool {
        self.terminate(TerminationCause::Cancelled(reason))
    }

    /// Records a winner. Returns `false` if the room had already terminated.
    pub fn record_win(&mut self, winner: Side) -> bool {
        self.terminate(TerminationCause::Won(winner))
    }

    /// Marks the game abandoned. Returns `false` if the room had already
    /// terminated.
    pub fn abandon(&mut self) -> bool {
        self.terminate(TerminationCause::Abandoned)
    }

    fn terminate(&mut self, cause: TerminationCause) -> bool {
        let target = match cause {
            TerminationCause::Won(_) => GameStatus::Finished,
            TerminationCause::Cancelled(_) | TerminationCause::Abandoned => GameStatus::Cancelled,
        };
        if self.closed || !self.game_state.status.can_transition_to(target) {
            return false;
        }
        self.game_state.status = target;
        match cause {
            TerminationCause::Cancelled(reason) => self.game_state.cancel_reason = Some(reason),
            TerminationCause::Won(side) => self.game_state.score.winner = Some(side),
            TerminationCause::Abandoned => {}
        }
        self.closed = true;

        tracing::info!(
            game_id = %self.id,
            game_type = %self.game_type,
            status = %self.game_state.status,
            "room terminated"
        );

        self.on_terminate.notify(RoomClosed {
            game_type: self.game_type,
            game_id: self.id,
            cause,
        });
        true
    }
}

// ---------------------------------------------------------------------------
// LocalGameRoom
// ---------------------------------------------------------------------------

/// A game played by several people on one browser.
///
/// Local rooms carry no identities and are never consulted for presence.
/// The browser finds its room again through the `localGameId` cookie.
#[derive(Debug, Clone)]
pub struct LocalGameRoom {
    id: GameId,
    game_state: GameState,
}

impl LocalGameRoom {
    pub fn new(id: GameId) -> Self {
        Self {
            id,
            game_state: GameState::waiting(),
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }
}
