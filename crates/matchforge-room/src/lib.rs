//! Game rooms and the room registry for Matchforge.
//!
//! A room holds two player slots and a game-state snapshot. Rooms live in
//! one of three registry partitions (remote, custom, local) and leave it
//! only through their own termination: a room that cancels, records a win,
//! or is abandoned emits a [`RoomClosed`] event exactly once, and the
//! [`RoomRegistry`] removes it when it drains those events.
//!
//! # Key types
//!
//! - [`GameRoom`] — a remote or custom room with two slots
//! - [`LocalGameRoom`] — a single-browser room with no identities
//! - [`GameState`] / [`GameStatus`] — the snapshot used for activity checks
//! - [`Partition`] — an insertion-ordered id → value map
//! - [`RoomRegistry`] — the three partitions plus the termination channel

mod config;
mod error;
mod partition;
mod registry;
mod room;

pub use config::{GameState, GameStatus, RoomConfig, Score};
pub use error::RoomError;
pub use partition::Partition;
pub use registry::RoomRegistry;
pub use room::{
    CloseNotifier, GameRoom, LocalGameRoom, Occupant, RoomClosed,
    TerminationCause,
};
