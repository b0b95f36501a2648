//! The directory contract as the lobby sees it: a shared handle whose
//! answers change as the bracket runner updates matches.

use std::sync::Arc;

use matchforge_protocol::{PlayerIdentity, TournamentId};
use matchforge_tournament::{
    Match, MatchStatus, TournamentBoard, TournamentDirectory,
};

fn id(s: &str) -> PlayerIdentity {
    PlayerIdentity::new(s)
}

/// The question the lobby asks: is this player playing a tournament
/// match right now?
fn in_live_match(dir: &impl TournamentDirectory, who: &PlayerIdentity) -> bool {
    dir.player_tournament(who)
        .and_then(|t| dir.next_match(t, who))
        .is_some_and(|m| m.status == MatchStatus::InProgress)
}

#[test]
fn test_answers_follow_board_updates() {
    let board = Arc::new(TournamentBoard::new());
    let runner = Arc::clone(&board);

    runner
        .register(TournamentId(1), vec![Match::new(id("alice"), id("bob"))])
        .unwrap();
    assert!(!in_live_match(board.as_ref(), &id("alice")));

    runner
        .set_match_status(TournamentId(1), &id("alice"), &id("bob"), MatchStatus::InProgress)
        .unwrap();
    assert!(in_live_match(board.as_ref(), &id("alice")));
    assert!(in_live_match(board.as_ref(), &id("bob")));

    runner
        .set_match_status(TournamentId(1), &id("alice"), &id("bob"), MatchStatus::Complete)
        .unwrap();
    assert!(!in_live_match(board.as_ref(), &id("alice")));
}

#[test]
fn test_unit_directory_knows_no_tournaments() {
    assert_eq!(().player_tournament(&id("alice")), None);
    assert_eq!(().next_match(TournamentId(1), &id("alice")), None);
}

#[test]
fn test_board_is_shareable_across_threads() {
    let board = Arc::new(TournamentBoard::new());
    board
        .register(TournamentId(2), vec![Match::new(id("carol"), id("dave"))])
        .unwrap();

    let reader = Arc::clone(&board);
    let handle = std::thread::spawn(move || reader.player_tournament(&id("dave")));
    assert_eq!(handle.join().unwrap(), Some(TournamentId(2)));
}
