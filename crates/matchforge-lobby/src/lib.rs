//! Presence checks and matchmaking for Matchforge.
//!
//! This crate enforces the lobby's one rule: a player is in at most one
//! active session at a time, counting remote rooms, custom invites, and
//! live tournament matches.
//!
//! 1. **Presence** — [`Presence`] answers "is this player busy?" from the
//!    room registry and the tournament directory.
//! 2. **Matchmaking** — [`Matchmaker`] joins, creates, reconnects, and
//!    cancels sessions, consulting presence before every seat assignment.
//!
//! # How it fits in the stack
//!
//! ```text
//! HTTP layer (above)  ← holds one Matchmaker behind a mutex
//!     ↕
//! Lobby layer (this crate)  ← presence + matchmaking rules
//!     ↕
//! Room / Tournament layers (below)  ← partitions, rooms, directory
//! ```

mod error;
mod manager;
mod presence;

pub use error::{LobbyError, Role};
pub use manager::{Matchmaker, Seat};
pub use presence::Presence;
