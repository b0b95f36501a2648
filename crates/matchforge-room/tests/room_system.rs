//! Integration tests for rooms and the registry working together.

use matchforge_protocol::{CancelReason, GameId, GameType, Player, Side};
use matchforge_room::{
    GameRoom, GameStatus, RoomRegistry, TerminationCause,
};

// =========================================================================
// Helpers
// =========================================================================

fn player(name: &str) -> Player {
    Player::named(name)
}

fn open_remote(reg: &mut RoomRegistry, id: u64, creator: &str) {
    let config = reg.room_config(GameType::Remote);
    reg.register(GameRoom::new(GameId(id), &player(creator), config))
        .expect("id should be free");
}

// =========================================================================
// Lifecycle
// =========================================================================

#[test]
fn test_first_open_room_follows_creation_order() {
    let mut reg = RoomRegistry::new();
    open_remote(&mut reg, 30, "a");
    open_remote(&mut reg, 10, "b");
    open_remote(&mut reg, 20, "c");

    let first = reg.remote().find_first(GameRoom::is_open);
    assert_eq!(first, Some(GameId(30)));

    reg.remote_mut()
        .get_mut(&GameId(30))
        .unwrap()
        .seat_opponent(&player("d"))
        .unwrap();
    assert_eq!(reg.remote().find_first(GameRoom::is_open), Some(GameId(10)));
}

#[test]
fn test_win_deregisters_room_and_frees_id() {
    let mut reg = RoomRegistry::new();
    open_remote(&mut reg, 1, "alice");
    {
        let room = reg.remote_mut().get_mut(&GameId(1)).unwrap();
        room.seat_opponent(&player("bob")).unwrap();
        assert_eq!(room.game_state().status, GameStatus::InProgress);
        assert!(room.record_win(Side::Left));
    }

    let reaped = reg.reap_closed();
    assert_eq!(reaped.len(), 1);
    assert_eq!(reaped[0].cause, TerminationCause::Won(Side::Left));
    assert!(!reg.remote().contains(&GameId(1)));

    // The id is reusable once reclaimed.
    open_remote(&mut reg, 1, "carol");
    assert_eq!(reg.remote().len(), 1);
}

#[test]
fn test_events_from_both_partitions_are_routed() {
    let mut reg = RoomRegistry::new();
    open_remote(&mut reg, 5, "alice");
    let config = reg.room_config(GameType::Custom);
    reg.register(GameRoom::with_opponent(
        GameId(5),
        &player("carol"),
        &player("dave"),
        config,
    ))
    .unwrap();

    reg.custom_mut()
        .get_mut(&GameId(5))
        .unwrap()
        .cancel(CancelReason::InviteDeclined);

    let reaped = reg.reap_closed();
    assert_eq!(reaped.len(), 1);
    assert_eq!(reaped[0].game_type, GameType::Custom);
    assert!(reg.custom().is_empty());
    assert!(reg.remote().contains(&GameId(5)), "remote room 5 is untouched");
}

#[test]
fn test_terminated_room_is_reaped_only_once() {
    let mut reg = RoomRegistry::new();
    open_remote(&mut reg, 8, "alice");

    let room = reg.remote_mut().get_mut(&GameId(8)).unwrap();
    assert!(room.abandon());
    assert!(!room.abandon());
    assert!(!room.cancel(CancelReason::OpponentLeft));

    assert_eq!(reg.reap_closed().len(), 1);
    assert!(reg.reap_closed().is_empty());
}

#[test]
fn test_game_state_serializes_for_clients() {
    let mut reg = RoomRegistry::new();
    open_remote(&mut reg, 2, "alice");
    let room = reg.remote_mut().get_mut(&GameId(2)).unwrap();
    room.cancel(CancelReason::Timeout);

    let json = serde_json::to_value(room.game_state()).unwrap();
    assert_eq!(json["status"], "cancelled");
    assert_eq!(json["cancel_reason"], "timeout");
    assert!(json["score"]["winner"].is_null());
}
