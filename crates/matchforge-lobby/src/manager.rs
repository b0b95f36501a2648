//! The matchmaker: join, create, reconnect, and cancel sessions.
//!
//! Every operation that seats a player asks the presence oracle first and
//! writes the registry immediately after. Those two steps must not
//! interleave with another request for the same player, so the matchmaker
//! takes `&mut self` everywhere and the server keeps it behind one lock.
//!
//! # Concurrency note
//!
//! `Matchmaker` is NOT thread-safe by itself. Wrapping it in a single
//! mutex makes each check-then-mutate sequence atomic, which is what keeps
//! a player from ending up in two active sessions.

use std::sync::Arc;

use matchforge_protocol::{
    CancelReason, GameId, GameType, Player, PlayerIdentity, Side, TournamentId,
};
use matchforge_room::{
    GameRoom, LocalGameRoom, Partition, RoomError, RoomRegistry,
};
use matchforge_tournament::{LocalPlayers, LocalTournament, TournamentDirectory};

use crate::{LobbyError, Presence, Role};

/// Where a player sits after a join, create, or reconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub game_id: GameId,
    pub side: Side,
    pub identity: PlayerIdentity,
}

/// Owns the room registry and local tournaments, and enforces that no
/// player holds more than one active session.
///
/// The tournament directory is an explicit handle shared with whatever
/// runs tournaments; the matchmaker only reads from it.
pub struct Matchmaker<T> {
    rooms: RoomRegistry,
    local_tournaments: Partition<TournamentId, LocalTournament>,
    tournaments: Arc<T>,
}

impl<T: TournamentDirectory> Matchmaker<T> {
    pub fn new(tournaments: Arc<T>) -> Self {
        Self {
            rooms: RoomRegistry::new(),
            local_tournaments: Partition::new(),
            tournaments,
        }
    }

    /// Returns `true` if `identity` is already in an active session.
    pub fn is_active(&self, identity: &PlayerIdentity) -> bool {
        Presence::new(&self.rooms, self.tournaments.as_ref()).is_active(identity)
    }

    /// Seats `requester` in the earliest-created open remote room.
    ///
    /// # Errors
    /// - [`LobbyError::AlreadyActive`] if the requester is busy
    /// - [`LobbyError::NoOpenRoom`] if every remote room is full; the caller
    ///   is expected to create one instead
    pub fn join(&mut self, requester: &Player) -> Result<Seat, LobbyError> {
        self.reap();
        self.ensure_free(&requester.identity, Role::Player)?;

        let game_id = self
            .rooms
            .remote()
            .find_first(|room| room.is_open() && room.is_active())
            .ok_or(LobbyError::NoOpenRoom)?;
        let room = self
            .rooms
            .remote_mut()
            .get_mut(&game_id)
            .ok_or(LobbyError::NoOpenRoom)?;
        room.seat_opponent(requester).map_err(|e| match e {
            RoomError::SlotTaken(_) => LobbyError::NoOpenRoom,
            other => not_found(GameType::Remote, other.to_string()),
        })?;

        tracing::info!(%game_id, identity = %requester.identity, "player joined remote room");
        Ok(Seat {
            game_id,
            side: Side::Right,
            identity: requester.identity.clone(),
        })
    }

    /// Finds the remote room `identity` is seated in so a dropped client
    /// can reconnect.
    ///
    /// No presence check: the player is active precisely because of this
    /// room. Terminated rooms are not eligible.
    ///
    /// # Errors
    /// [`LobbyError::RoomNotFound`] if no active remote room holds the player.
    pub fn reenter(&mut self, identity: &PlayerIdentity) -> Result<Seat, LobbyError> {
        self.reap();
        self.rooms
            .remote()
            .iter()
            .filter(|(_, room)| room.is_active())
            .find_map(|(game_id, room)| {
                room.side_of(identity).map(|side| Seat {
                    game_id,
                    side,
                    identity: identity.clone(),
                })
            })
            .inspect(|seat| {
                tracing::debug!(game_id = %seat.game_id, %identity, side = %seat.side, "player re-entered");
            })
            .ok_or_else(|| not_found(GameType::Remote, identity.to_string()))
    }

    /// Opens a remote room with `creator` on the left.
    ///
    /// # Errors
    /// - [`LobbyError::AlreadyActive`] if the creator is busy
    /// - [`LobbyError::DuplicateRoomId`] if `game_id` is taken
    pub fn create_remote(&mut self, game_id: GameId, creator: &Player) -> Result<Seat, LobbyError> {
        self.reap();
        self.ensure_free(&creator.identity, Role::Player)?;

        let config = self.rooms.room_config(GameType::Remote);
        self.rooms
            .register(GameRoom::new(game_id, creator, config))
            .map_err(|e| duplicate(GameType::Remote, e))?;

        Ok(Seat {
            game_id,
            side: Side::Left,
            identity: creator.identity.clone(),
        })
    }

    /// Creates a custom game between `inviter` and `invitee`. Both seats
    /// are filled up front.
    ///
    /// # Errors
    /// - [`LobbyError::AlreadyActive`] with [`Role::Inviter`] or
    ///   [`Role::Invitee`], naming whoever is busy
    /// - [`LobbyError::DuplicateRoomId`] if `game_id` is taken
    pub fn create_custom(
        &mut self,
        game_id: GameId,
        inviter: &Player,
        invitee: &PlayerIdentity,
    ) -> Result<GameId, LobbyError> {
        self.reap();
        self.ensure_free(&inviter.identity, Role::Inviter)?;
        self.ensure_free(invitee, Role::Invitee)?;

        let invitee = Player {
            identity: invitee.clone(),
            display_name: invitee.to_string(),
        };
        let config = self.rooms.room_config(GameType::Custom);
        self.rooms
            .register(GameRoom::with_opponent(game_id, inviter, &invitee, config))
            .map_err(|e| duplicate(GameType::Custom, e))?;

        Ok(game_id)
    }

    /// Cancels a custom game.
    ///
    /// Returns `false` if no such room exists, including when it was
    /// already cancelled. On `true` the room has been deregistered.
    pub fn cancel_custom(&mut self, game_id: GameId, reason: CancelReason) -> bool {
        self.reap();
        let Some(room) = self.rooms.custom_mut().get_mut(&game_id) else {
            tracing::debug!(%game_id, %reason, "cancel for unknown custom room");
            return false;
        };
        let cancelled = room.cancel(reason);
        self.reap();
        cancelled
    }

    /// Records the winner of a remote or custom game, ending it.
    ///
    /// # Errors
    /// [`LobbyError::RoomNotFound`] if the room is not registered.
    pub fn record_win(
        &mut self,
        game_type: GameType,
        game_id: GameId,
        winner: Side,
    ) -> Result<(), LobbyError> {
        self.terminate(game_type, game_id, |room| room.record_win(winner))
    }

    /// Ends a remote or custom game that a player walked away from.
    ///
    /// # Errors
    /// [`LobbyError::RoomNotFound`] if the room is not registered.
    pub fn abandon(&mut self, game_type: GameType, game_id: GameId) -> Result<(), LobbyError> {
        self.terminate(game_type, game_id, GameRoom::abandon)
    }

    /// Registers a local room. Local sessions are tied to a browser, not an
    /// identity, so there is no presence check.
    ///
    /// # Errors
    /// [`LobbyError::DuplicateRoomId`] if `game_id` is taken.
    pub fn create_local(&mut self, game_id: GameId) -> Result<GameId, LobbyError> {
        self.rooms
            .register_local(LocalGameRoom::new(game_id))
            .map_err(|e| duplicate(GameType::Local, e))?;
        Ok(game_id)
    }

    /// Registers a local four-player tournament.
    ///
    /// # Errors
    /// - [`LobbyError::DuplicateRoomId`] if `id` is taken
    /// - [`LobbyError::Tournament`] if the player names are invalid
    pub fn create_local_tournament(
        &mut self,
        id: TournamentId,
        players: LocalPlayers,
    ) -> Result<&LocalTournament, LobbyError> {
        if self.local_tournaments.contains(&id) {
            return Err(LobbyError::DuplicateRoomId {
                kind: "local tournament".into(),
                id: id.to_string(),
            });
        }
        let tournament = LocalTournament::new(players, id)?;
        let tournament = self
            .local_tournaments
            .insert(id, tournament)
            .map_err(|_| LobbyError::DuplicateRoomId {
                kind: "local tournament".into(),
                id: id.to_string(),
            })?;
        tracing::info!(tournament_id = %id, "local tournament created");
        Ok(tournament)
    }

    pub fn local_room(&self, game_id: GameId) -> Option<&LocalGameRoom> {
        self.rooms.local().get(&game_id)
    }

    pub fn local_tournament(&self, id: TournamentId) -> Option<&LocalTournament> {
        self.local_tournaments.get(&id)
    }

    /// Returns `true` if `game_id` is registered in the `game_type`
    /// partition.
    pub fn contains(&self, game_type: GameType, game_id: GameId) -> bool {
        match self.rooms.partition(game_type) {
            Some(partition) => partition.contains(&game_id),
            None => self.rooms.local().contains(&game_id),
        }
    }

    pub fn contains_local_tournament(&self, id: TournamentId) -> bool {
        self.local_tournaments.contains(&id)
    }

    /// Ids of open remote rooms, in the order `join` would pick them.
    ///
    /// Open rooms are never swept; a long-lived server will see this list
    /// grow with abandoned creates.
    pub fn open_rooms(&self) -> Vec<GameId> {
        self.rooms
            .remote()
            .iter()
            .filter(|(_, room)| room.is_open() && room.is_active())
            .map(|(id, _)| id)
            .collect()
    }

    /// Read-only access to the registry.
    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    fn ensure_free(&self, identity: &PlayerIdentity, role: Role) -> Result<(), LobbyError> {
        if self.is_active(identity) {
            tracing::debug!(%identity, ?role, "rejected: player busy");
            return Err(LobbyError::AlreadyActive {
                identity: identity.clone(),
                role,
            });
        }
        Ok(())
    }

    fn terminate(
        &mut self,
        game_type: GameType,
        game_id: GameId,
        end: impl FnOnce(&mut GameRoom) -> bool,
    ) -> Result<(), LobbyError> {
        self.reap();
        let room = self
            .rooms
            .partition_mut(game_type)
            .and_then(|p| p.get_mut(&game_id))
            .ok_or_else(|| not_found(game_type, game_id.to_string()))?;
        end(room);
        self.reap();
        Ok(())
    }

    fn reap(&mut self) {
        let reaped = self.rooms.reap_closed();
        if !reaped.is_empty() {
            tracing::debug!(count = reaped.len(), "reaped closed rooms");
        }
    }
}

fn not_found(game_type: GameType, target: String) -> LobbyError {
    LobbyError::RoomNotFound { game_type, target }
}

fn duplicate(game_type: GameType, err: RoomError) -> LobbyError {
    match err {
        RoomError::DuplicateId(id) => LobbyError::DuplicateRoomId {
            kind: game_type.to_string(),
            id,
        },
        other => not_found(game_type, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mm() -> Matchmaker<()> {
        Matchmaker::new(Arc::new(()))
    }

    fn p(name: &str) -> Player {
        Player::named(name)
    }

    #[test]
    fn test_join_without_rooms_is_no_open_room() {
        let mut mm = mm();
        assert!(matches!(mm.join(&p("bob")), Err(LobbyError::NoOpenRoom)));
    }

    #[test]
    fn test_create_remote_then_join() {
        let mut mm = mm();
        let seat = mm.create_remote(GameId(7), &p("alice")).unwrap();
        assert_eq!(seat.side, Side::Left);

        let seat = mm.join(&p("bob")).unwrap();
        assert_eq!(seat.game_id, GameId(7));
        assert_eq!(seat.side, Side::Right);
        assert!(mm.open_rooms().is_empty());
    }

    #[test]
    fn test_creator_cannot_open_second_room() {
        let mut mm = mm();
        mm.create_remote(GameId(1), &p("alice")).unwrap();

        let err = mm.create_remote(GameId(2), &p("alice")).unwrap_err();
        assert!(matches!(err, LobbyError::AlreadyActive { role: Role::Player, .. }));
        assert!(!mm.contains(GameType::Remote, GameId(2)));
    }

    #[test]
    fn test_duplicate_remote_id_is_rejected() {
        let mut mm = mm();
        mm.create_remote(GameId(1), &p("alice")).unwrap();

        let err = mm.create_remote(GameId(1), &p("bob")).unwrap_err();
        assert!(matches!(err, LobbyError::DuplicateRoomId { .. }));
        let room = mm.rooms().remote().get(&GameId(1)).unwrap();
        assert_eq!(room.player1().identity.as_str(), "alice");
    }

    #[test]
    fn test_record_win_frees_both_players() {
        let mut mm = mm();
        mm.create_remote(GameId(1), &p("alice")).unwrap();
        mm.join(&p("bob")).unwrap();

        mm.record_win(GameType::Remote, GameId(1), Side::Right).unwrap();

        assert!(!mm.contains(GameType::Remote, GameId(1)));
        assert!(!mm.is_active(&"alice".into()));
        assert!(!mm.is_active(&"bob".into()));
        assert!(mm.record_win(GameType::Remote, GameId(1), Side::Left).is_err());
    }

    #[test]
    fn test_abandon_unknown_room() {
        let mut mm = mm();
        let err = mm.abandon(GameType::Custom, GameId(3)).unwrap_err();
        assert!(matches!(
            err,
            LobbyError::RoomNotFound { game_type: GameType::Custom, .. }
        ));
    }

    #[test]
    fn test_local_rooms_skip_presence_and_reject_duplicates() {
        let mut mm = mm();
        mm.create_remote(GameId(1), &p("alice")).unwrap();

        // Same numeric id, different partition.
        assert_eq!(mm.create_local(GameId(1)).unwrap(), GameId(1));
        assert!(mm.local_room(GameId(1)).is_some());
        assert!(matches!(
            mm.create_local(GameId(1)),
            Err(LobbyError::DuplicateRoomId { .. })
        ));
    }

    #[test]
    fn test_local_tournament_lifecycle() {
        let mut mm = mm();
        let players = LocalPlayers {
            player1: "a".into(),
            player2: "b".into(),
            player3: "c".into(),
            player4: "d".into(),
        };

        let t = mm.create_local_tournament(TournamentId(5), players.clone()).unwrap();
        assert_eq!(t.id(), TournamentId(5));
        assert!(mm.local_tournament(TournamentId(5)).is_some());
        assert!(mm.contains_local_tournament(TournamentId(5)));

        assert!(matches!(
            mm.create_local_tournament(TournamentId(5), players),
            Err(LobbyError::DuplicateRoomId { .. })
        ));
    }
}
