//! Tournament collaborator for Matchforge.
//!
//! The bracket algorithm is not part of Matchforge. The lobby only needs to
//! ask two questions of whatever runs tournaments:
//!
//! 1. Is this player entered in a tournament?
//! 2. What is their next match, and is it being played right now?
//!
//! Those questions form the [`TournamentDirectory`] trait. The server
//! owns one directory and hands it to the lobby explicitly.
//! [`TournamentBoard`] is an in-memory directory for servers that keep
//! tournaments in the same process (and for tests).
//!
//! [`LocalTournament`] is the single-browser variant: four named players,
//! no identities, resumed through a cookie.

mod board;
mod directory;
mod error;
mod local;

pub use board::TournamentBoard;
pub use directory::{Match, MatchStatus, TournamentDirectory};
pub use error::TournamentError;
pub use local::{LocalMatch, LocalPlayers, LocalTournament, LocalTournamentState};
