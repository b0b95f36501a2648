//! Presence oracle: is a player already in an active session?
//!
//! This is the single authority consulted before any operation that seats
//! a player. It reads current state on every call and keeps no cache.

use matchforge_protocol::PlayerIdentity;
use matchforge_room::RoomRegistry;
use matchforge_tournament::{MatchStatus, TournamentDirectory};

/// Borrowed view over everything that can make a player busy.
pub struct Presence<'a, T: ?Sized> {
    rooms: &'a RoomRegistry,
    tournaments: &'a T,
}

impl<'a, T> Presence<'a, T>
where
    T: TournamentDirectory + ?Sized,
{
    pub fn new(rooms: &'a RoomRegistry, tournaments: &'a T) -> Self {
        Self { rooms, tournaments }
    }

    /// Returns `true` if `identity` occupies a slot in an active remote or
    /// custom room, or is playing a tournament match right now.
    ///
    /// An empty identity is never active. Rooms are scanned remote first,
    /// then custom, stopping at the first hit; the tournament directory is
    /// only asked when no room matched.
    pub fn is_active(&self, identity: &PlayerIdentity) -> bool {
        if identity.is_empty() {
            return false;
        }
        if let Some(room) = self
            .rooms
            .game_rooms()
            .find(|room| room.is_active() && room.side_of(identity).is_some())
        {
            tracing::debug!(%identity, game_id = %room.id(), "player busy in room");
            return true;
        }
        self.in_live_tournament_match(identity)
    }

    fn in_live_tournament_match(&self, identity: &PlayerIdentity) -> bool {
        let Some(tournament) = self.tournaments.player_tournament(identity) else {
            return false;
        };
        let live = self
            .tournaments
            .next_match(tournament, identity)
            .is_some_and(|m| m.status == MatchStatus::InProgress);
        if live {
            tracing::debug!(%identity, tournament_id = %tournament, "player busy in tournament");
        }
        live
    }
}

#[cfg(test)]
mod tests {
    use matchforge_protocol::{
        CancelReason, GameId, GameType, Player, Side, TournamentId,
    };
    use matchforge_room::GameRoom;
    use matchforge_tournament::{Match, TournamentBoard};

    use super::*;

    fn id(s: &str) -> PlayerIdentity {
        PlayerIdentity::new(s)
    }

    fn add_room(reg: &mut RoomRegistry, kind: GameType, game_id: u64, p1: &str, p2: Option<&str>) {
        let config = reg.room_config(kind);
        let room = match p2 {
            Some(p2) => GameRoom::with_opponent(
                GameId(game_id),
                &Player::named(p1),
                &Player::named(p2),
                config,
            ),
            None => GameRoom::new(GameId(game_id), &Player::named(p1), config),
        };
        reg.register(room).unwrap();
    }

    #[test]
    fn test_empty_identity_is_never_active() {
        let mut reg = RoomRegistry::new();
        add_room(&mut reg, GameType::Remote, 1, "", None);
        assert!(!Presence::new(&reg, &()).is_active(&id("")));
    }

    #[test]
    fn test_either_slot_in_either_partition_counts() {
        let mut reg = RoomRegistry::new();
        add_room(&mut reg, GameType::Remote, 1, "alice", None);
        add_room(&mut reg, GameType::Custom, 1, "carol", Some("dave"));
        let presence = Presence::new(&reg, &());

        assert!(presence.is_active(&id("alice")));
        assert!(presence.is_active(&id("carol")));
        assert!(presence.is_active(&id("dave")));
        assert!(!presence.is_active(&id("erin")));
    }

    #[test]
    fn test_terminated_rooms_do_not_count() {
        let mut reg = RoomRegistry::new();
        add_room(&mut reg, GameType::Remote, 1, "alice", Some("bob"));
        add_room(&mut reg, GameType::Custom, 2, "carol", Some("dave"));

        reg.remote_mut().get_mut(&GameId(1)).unwrap().record_win(Side::Left);
        reg.custom_mut()
            .get_mut(&GameId(2))
            .unwrap()
            .cancel(CancelReason::Timeout);

        // Still registered (not reaped yet) but no longer active.
        assert_eq!(reg.game_rooms().count(), 2);
        let presence = Presence::new(&reg, &());
        for who in ["alice", "bob", "carol", "dave"] {
            assert!(!presence.is_active(&id(who)), "{who} should be free");
        }
    }

    #[test]
    fn test_only_in_progress_tournament_match_counts() {
        let reg = RoomRegistry::new();
        let board = TournamentBoard::new();
        board
            .register(TournamentId(1), vec![Match::new(id("alice"), id("bob"))])
            .unwrap();

        assert!(!Presence::new(&reg, &board).is_active(&id("alice")));

        board
            .set_match_status(TournamentId(1), &id("alice"), &id("bob"), MatchStatus::InProgress)
            .unwrap();
        assert!(Presence::new(&reg, &board).is_active(&id("alice")));

        board
            .set_match_status(TournamentId(1), &id("alice"), &id("bob"), MatchStatus::Complete)
            .unwrap();
        assert!(!Presence::new(&reg, &board).is_active(&id("bob")));
    }
}
