//! Shared vocabulary for Matchforge.
//!
//! This crate defines the types every other layer speaks:
//!
//! - **Identity** ([`GameId`], [`TournamentId`], [`PlayerIdentity`],
//!   [`Player`]) — who and what a session is about.
//! - **Session enums** ([`GameType`], [`Side`], [`CancelReason`]) — the
//!   small closed sets that travel to and from clients.
//! - **Replies** ([`SessionReply`], [`ConflictReply`], ...) — the JSON
//!   shapes the HTTP endpoints return.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding or
//!   decoding those values.
//!
//! # Architecture
//!
//! The protocol layer sits at the bottom of the stack. It knows nothing
//! about rooms, presence, or HTTP — only how values are named and how they
//! look on the wire.
//!
//! ```text
//! HTTP (matchforge) → Lobby → Room / Tournament → Protocol (this crate)
//! ```

mod error;
mod types;

pub use error::ProtocolError;
pub use types::{
    CancelReason, CancelReply, ConflictReply, ConflictState, ErrorReply,
    GameId, GameType, Player, PlayerIdentity, ReplyState, SessionReply, Side,
    TournamentId,
};
