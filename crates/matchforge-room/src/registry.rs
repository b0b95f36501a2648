//! Room registry: the three partitions and the termination channel.

use matchforge_protocol::{GameId, GameType};
use tokio::sync::mpsc;

use crate::{
    CloseNotifier, GameRoom, LocalGameRoom, Partition, RoomClosed, RoomConfig,
    RoomError,
};

/// All rooms held in server memory.
///
/// Remote and custom rooms share the [`GameRoom`] type but live in
/// separate partitions; ids are unique per partition only. Rooms are
/// removed exclusively by [`reap_closed`](Self::reap_closed), which drains
/// the termination events the rooms sent themselves.
///
/// Not thread-safe by itself: the owner serializes access (the HTTP layer
/// keeps the whole lobby behind one mutex).
pub struct RoomRegistry {
    remote: Partition<GameId, GameRoom>,
    custom: Partition<GameId, GameRoom>,
    local: Partition<GameId, LocalGameRoom>,
    closed_tx: mpsc::UnboundedSender<RoomClosed>,
    closed_rx: mpsc::UnboundedReceiver<RoomClosed>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        let (closed_tx, closed_rx) = mpsc::unbounded_channel();
        Self {
            remote: Partition::new(),
            custom: Partition::new(),
            local: Partition::new(),
            closed_tx,
            closed_rx,
        }
    }

    /// Builds the configuration for a new room in the `game_type`
    /// partition, wired to this registry's termination channel.
    pub fn room_config(&self, game_type: GameType) -> RoomConfig {
        RoomConfig {
            game_type,
            on_terminate: CloseNotifier::new(self.closed_tx.clone()),
        }
    }

    /// Registers a remote or custom room in the partition named by its
    /// game type.
    ///
    /// # Errors
    /// [`RoomError::DuplicateId`] if the id is taken in that partition.
    pub fn register(&mut self, room: GameRoom) -> Result<&mut GameRoom, RoomError> {
        let game_id = room.id();
        let game_type = room.game_type();
        let partition = self
            .partition_mut(game_type)
            .ok_or(RoomError::NotFound(game_id))?;
        let room = partition.insert(game_id, room)?;
        tracing::info!(%game_id, %game_type, "room registered");
        Ok(room)
    }

    /// Registers a local room.
    pub fn register_local(
        &mut self,
        room: LocalGameRoom,
    ) -> Result<&mut LocalGameRoom, RoomError> {
        let game_id = room.id();
        let room = self.local.insert(game_id, room)?;
        tracing::info!(%game_id, game_type = %GameType::Local, "room registered");
        Ok(room)
    }

    /// Drains pending termination events and removes the rooms they name.
    ///
    /// An event only removes a room that is actually closed, so a stale
    /// event can never evict a newer room registered under the same id.
    pub fn reap_closed(&mut self) -> Vec<RoomClosed> {
        let mut reaped = Vec::new();
        while let Ok(event) = self.closed_rx.try_recv() {
            let Some(partition) = self.partition_mut(event.game_type) else {
                tracing::warn!(
                    game_id = %event.game_id,
                    game_type = %event.game_type,
                    "termination event for a partition without game rooms"
                );
                continue;
            };
            let is_closed = partition
                .get(&event.game_id)
                .is_some_and(GameRoom::is_closed);
            if !is_closed {
                tracing::warn!(
                    game_id = %event.game_id,
                    "termination event for an unknown room"
                );
                continue;
            }
            partition.remove(&event.game_id);
            tracing::info!(
                game_id = %event.game_id,
                game_type = %event.game_type,
                "room deregistered"
            );
            reaped.push(event);
        }
        reaped
    }

    /// Returns the partition for remote or custom rooms. Local rooms have
    /// their own type and live in [`local`](Self::local).
    pub fn partition(&self, game_type: GameType) -> Option<&Partition<GameId, GameRoom>> {
        match game_type {
            GameType::Remote => Some(&self.remote),
            GameType::Custom => Some(&self.custom),
            GameType::Local => None,
        }
    }

    pub fn partition_mut(
        &mut self,
        game_type: GameType,
    ) -> Option<&mut Partition<GameId, GameRoom>> {
        match game_type {
            GameType::Remote => Some(&mut self.remote),
            GameType::Custom => Some(&mut self.custom),
            GameType::Local => None,
        }
    }

    pub fn remote(&self) -> &Partition<GameId, GameRoom> {
        &self.remote
    }

    pub fn remote_mut(&mut self) -> &mut Partition<GameId, GameRoom> {
        &mut self.remote
    }

    pub fn custom(&self) -> &Partition<GameId, GameRoom> {
        &self.custom
    }

    pub fn custom_mut(&mut self) -> &mut Partition<GameId, GameRoom> {
        &mut self.custom
    }

    pub fn local(&self) -> &Partition<GameId, LocalGameRoom> {
        &self.local
    }

    /// Iterates every identity-bearing room: remote first, then custom.
    pub fn game_rooms(&self) -> impl Iterator<Item = &GameRoom> + '_ {
        self.remote
            .iter()
            .chain(self.custom.iter())
            .map(|(_, room)| room)
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
