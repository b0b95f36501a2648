//! Request handlers: authenticate, lock the lobby, reply.
//!
//! Authenticated handlers resolve the bearer token before touching the
//! lobby, so a slow authenticator never holds the lock. Local-session
//! handlers skip authentication entirely and correlate by cookie.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use matchforge_lobby::{LobbyError, Matchmaker, Seat};
use matchforge_protocol::{
    CancelReason, CancelReply, GameId, GameType, Player, PlayerIdentity, ProtocolError,
    ReplyState, SessionReply, Side, TournamentId,
};
use matchforge_tournament::{LocalPlayers, LocalTournamentState, TournamentDirectory};
use rand::Rng;
use serde::Deserialize;

use crate::auth::bearer_token;
use crate::cookie::{local_game_id, local_tournament_id};
use crate::server::AppState;
use crate::{Authenticator, MatchforgeError};

type AppStateRef<T, A> = State<Arc<AppState<T, A>>>;

/// Body of `POST /games/custom`.
#[derive(Debug, Deserialize)]
pub(crate) struct CustomGameRequest {
    invitee: PlayerIdentity,
}

/// Body of `POST /games/{remote,custom}/{id}/result`.
#[derive(Debug, Deserialize)]
pub(crate) struct ResultRequest {
    winner: Side,
}

/// Query of `DELETE /games/custom/{id}`.
#[derive(Debug, Deserialize)]
pub(crate) struct CancelQuery {
    reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Remote games
// ---------------------------------------------------------------------------

/// `POST /games/remote`: reconnect, else join the first open room, else
/// open a new one.
pub(crate) async fn enter_remote<T, A>(
    State(state): AppStateRef<T, A>,
    headers: HeaderMap,
) -> Result<Json<SessionReply>, MatchforgeError>
where
    T: TournamentDirectory,
    A: Authenticator,
{
    let player = authenticate(&state, &headers).await?;
    let mut lobby = state.lobby.lock().await;

    if let Ok(seat) = lobby.reenter(&player.identity) {
        return Ok(Json(remote_reply(ReplyState::Enter, seat)));
    }

    match lobby.join(&player) {
        Ok(seat) => Ok(Json(remote_reply(ReplyState::Joined, seat))),
        Err(LobbyError::NoOpenRoom) => {
            let game_id = allocate_game_id(&lobby, GameType::Remote);
            let seat = lobby.create_remote(game_id, &player)?;
            Ok(Json(remote_reply(ReplyState::Created, seat)))
        }
        Err(e) => Err(e.into()),
    }
}

/// `GET /games/remote`: reconnect only.
pub(crate) async fn reenter_remote<T, A>(
    State(state): AppStateRef<T, A>,
    headers: HeaderMap,
) -> Result<Json<SessionReply>, MatchforgeError>
where
    T: TournamentDirectory,
    A: Authenticator,
{
    let player = authenticate(&state, &headers).await?;
    let seat = state.lobby.lock().await.reenter(&player.identity)?;
    Ok(Json(remote_reply(ReplyState::Enter, seat)))
}

// ---------------------------------------------------------------------------
// Custom games
// ---------------------------------------------------------------------------

/// `POST /games/custom`: invite a specific player.
pub(crate) async fn create_custom<T, A>(
    State(state): AppStateRef<T, A>,
    headers: HeaderMap,
    Json(body): Json<CustomGameRequest>,
) -> Result<Json<SessionReply>, MatchforgeError>
where
    T: TournamentDirectory,
    A: Authenticator,
{
    let inviter = authenticate(&state, &headers).await?;
    if body.invitee.is_empty() {
        return Err(ProtocolError::InvalidMessage("invitee is required".into()).into());
    }
    if body.invitee == inviter.identity {
        return Err(ProtocolError::InvalidMessage("cannot invite yourself".into()).into());
    }

    let mut lobby = state.lobby.lock().await;
    let game_id = allocate_game_id(&lobby, GameType::Custom);
    let game_id = lobby.create_custom(game_id, &inviter, &body.invitee)?;

    Ok(Json(SessionReply {
        state: ReplyState::Created,
        side: None,
        game_mode: GameType::Custom,
        name: None,
        id: game_id,
    }))
}

/// `DELETE /games/custom/{id}?reason=`: withdraw or decline an invite.
///
/// Only a participant may cancel. An unknown id answers
/// `{"cancelled": false}` rather than 404.
pub(crate) async fn cancel_custom<T, A>(
    State(state): AppStateRef<T, A>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<CancelQuery>,
) -> Result<Json<CancelReply>, MatchforgeError>
where
    T: TournamentDirectory,
    A: Authenticator,
{
    let player = authenticate(&state, &headers).await?;
    let game_id: GameId = id.parse()?;
    let reason = match query.reason.as_deref() {
        Some(reason) => reason.parse()?,
        None => CancelReason::default(),
    };

    let mut lobby = state.lobby.lock().await;
    let outsider = lobby
        .rooms()
        .custom()
        .get(&game_id)
        .is_some_and(|room| room.side_of(&player.identity).is_none());
    if outsider {
        return Err(MatchforgeError::Forbidden(format!(
            "{} is not part of {game_id}",
            player.identity
        )));
    }

    let cancelled = lobby.cancel_custom(game_id, reason);
    if cancelled {
        tracing::info!(%game_id, %reason, by = %player.identity, "custom room cancelled");
    }
    Ok(Json(CancelReply { cancelled }))
}

// ---------------------------------------------------------------------------
// Game results
// ---------------------------------------------------------------------------

/// `POST /games/remote/{id}/result`: the game layer reports a winner.
pub(crate) async fn remote_result<T, A>(
    state: AppStateRef<T, A>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ResultRequest>,
) -> Result<StatusCode, MatchforgeError>
where
    T: TournamentDirectory,
    A: Authenticator,
{
    record_result(state, &headers, GameType::Remote, &id, body.winner).await
}

/// `POST /games/custom/{id}/result`: the game layer reports a winner.
pub(crate) async fn custom_result<T, A>(
    state: AppStateRef<T, A>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ResultRequest>,
) -> Result<StatusCode, MatchforgeError>
where
    T: TournamentDirectory,
    A: Authenticator,
{
    record_result(state, &headers, GameType::Custom, &id, body.winner).await
}

/// `DELETE /games/remote/{id}`: a participant walks away, or a creator
/// withdraws an open room. Both seats are freed.
pub(crate) async fn abandon_remote<T, A>(
    State(state): AppStateRef<T, A>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, MatchforgeError>
where
    T: TournamentDirectory,
    A: Authenticator,
{
    let player = authenticate(&state, &headers).await?;
    let game_id: GameId = id.parse()?;

    let mut lobby = state.lobby.lock().await;
    ensure_participant(&lobby, GameType::Remote, game_id, &player.identity)?;
    lobby.abandon(GameType::Remote, game_id)?;
    tracing::debug!(%game_id, by = %player.identity, "remote room abandoned");
    Ok(StatusCode::NO_CONTENT)
}

async fn record_result<T, A>(
    State(state): AppStateRef<T, A>,
    headers: &HeaderMap,
    game_type: GameType,
    id: &str,
    winner: Side,
) -> Result<StatusCode, MatchforgeError>
where
    T: TournamentDirectory,
    A: Authenticator,
{
    let player = authenticate(&state, headers).await?;
    let game_id: GameId = id.parse()?;

    let mut lobby = state.lobby.lock().await;
    ensure_participant(&lobby, game_type, game_id, &player.identity)?;
    lobby.record_win(game_type, game_id, winner)?;
    tracing::debug!(%game_id, %game_type, %winner, by = %player.identity, "result recorded");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Local sessions
// ---------------------------------------------------------------------------

/// `POST /games/local`: open a shared-screen game and hand the browser its
/// cookie.
pub(crate) async fn create_local<T, A>(
    State(state): AppStateRef<T, A>,
) -> Result<impl IntoResponse, MatchforgeError>
where
    T: TournamentDirectory,
    A: Authenticator,
{
    let game_id = {
        let mut lobby = state.lobby.lock().await;
        let game_id = allocate_game_id(&lobby, GameType::Local);
        lobby.create_local(game_id)?
    };

    let cookie = state.cookies.local_game(game_id);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(local_reply(ReplyState::Created, game_id)),
    ))
}

/// `GET /games/local`: find the game named by the browser's cookie.
pub(crate) async fn resume_local<T, A>(
    State(state): AppStateRef<T, A>,
    headers: HeaderMap,
) -> Result<Json<SessionReply>, MatchforgeError>
where
    T: TournamentDirectory,
    A: Authenticator,
{
    let game_id = local_game_id(&headers)
        .ok_or_else(|| MatchforgeError::NoLocalSession("no local game cookie".into()))??;

    let lobby = state.lobby.lock().await;
    let room = lobby.local_room(game_id).ok_or_else(|| {
        tracing::debug!(%game_id, "stale local game cookie");
        MatchforgeError::NoLocalSession(format!("{game_id} is gone"))
    })?;
    Ok(Json(local_reply(ReplyState::Enter, room.id())))
}

/// `POST /tournaments/local`: seed a four-player bracket and hand the
/// browser its cookie.
pub(crate) async fn create_local_tournament<T, A>(
    State(state): AppStateRef<T, A>,
    Json(players): Json<LocalPlayers>,
) -> Result<impl IntoResponse, MatchforgeError>
where
    T: TournamentDirectory,
    A: Authenticator,
{
    let tournament = {
        let mut lobby = state.lobby.lock().await;
        let id = allocate_tournament_id(&lobby);
        lobby.create_local_tournament(id, players)?.state().clone()
    };

    let cookie = state.cookies.local_tournament(tournament.id)?;
    Ok(([(header::SET_COOKIE, cookie)], Json(tournament)))
}

/// `GET /tournaments/local`: return the bracket named by the browser's
/// cookie.
pub(crate) async fn resume_local_tournament<T, A>(
    State(state): AppStateRef<T, A>,
    headers: HeaderMap,
) -> Result<Json<LocalTournamentState>, MatchforgeError>
where
    T: TournamentDirectory,
    A: Authenticator,
{
    let id = local_tournament_id(&headers)
        .ok_or_else(|| MatchforgeError::NoLocalSession("no local tournament cookie".into()))??;

    let lobby = state.lobby.lock().await;
    let tournament = lobby.local_tournament(id).ok_or_else(|| {
        tracing::debug!(tournament_id = %id, "stale local tournament cookie");
        MatchforgeError::NoLocalSession(format!("{id} is gone"))
    })?;
    Ok(Json(tournament.state().clone()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn authenticate<T, A: Authenticator>(
    state: &AppState<T, A>,
    headers: &HeaderMap,
) -> Result<Player, MatchforgeError> {
    let token = bearer_token(headers)?;
    let player = state.auth.authenticate(token).await?;
    Ok(player)
}

/// Only the two seated players may end a room.
fn ensure_participant<T: TournamentDirectory>(
    lobby: &Matchmaker<T>,
    game_type: GameType,
    game_id: GameId,
    identity: &PlayerIdentity,
) -> Result<(), MatchforgeError> {
    let room = lobby
        .rooms()
        .partition(game_type)
        .and_then(|p| p.get(&game_id))
        .ok_or_else(|| LobbyError::RoomNotFound {
            game_type,
            target: game_id.to_string(),
        })?;
    if room.side_of(identity).is_none() {
        return Err(MatchforgeError::Forbidden(format!(
            "{identity} is not part of {game_id}"
        )));
    }
    Ok(())
}

fn remote_reply(state: ReplyState, seat: Seat) -> SessionReply {
    SessionReply {
        state,
        side: Some(seat.side),
        game_mode: GameType::Remote,
        name: Some(seat.identity.to_string()),
        id: seat.game_id,
    }
}

fn local_reply(state: ReplyState, id: GameId) -> SessionReply {
    SessionReply {
        state,
        side: None,
        game_mode: GameType::Local,
        name: None,
        id,
    }
}

/// Ids are drawn at random so a local-session cookie can't be guessed from
/// another one.
fn random_id() -> u64 {
    rand::rng().random_range(1..=i32::MAX as u64)
}

fn allocate_game_id<T: TournamentDirectory>(lobby: &Matchmaker<T>, game_type: GameType) -> GameId {
    loop {
        let id = GameId(random_id());
        if !lobby.contains(game_type, id) {
            return id;
        }
    }
}

fn allocate_tournament_id<T: TournamentDirectory>(lobby: &Matchmaker<T>) -> TournamentId {
    loop {
        let id = TournamentId(random_id());
        if !lobby.contains_local_tournament(id) {
            return id;
        }
    }
}
