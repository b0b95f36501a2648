//! Error types for the room layer.

use matchforge_protocol::GameId;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The id is already registered in the target partition.
    #[error("id {0} is already registered")]
    DuplicateId(String),

    /// The room does not exist in the partition that was searched.
    #[error("room {0} not found")]
    NotFound(GameId),

    /// The second slot was already filled. A room seats its opponent once.
    #[error("room {0} already has an opponent")]
    SlotTaken(GameId),
}
