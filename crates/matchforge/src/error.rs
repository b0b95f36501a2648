//! Unified error type for the Matchforge service.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use matchforge_lobby::LobbyError;
use matchforge_protocol::{ConflictReply, ErrorReply, ProtocolError};

/// Authentication failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request carried no bearer token.
    #[error("missing bearer token")]
    MissingToken,

    /// The [`Authenticator`](crate::Authenticator) refused the token.
    #[error("authentication failed: {0}")]
    Rejected(String),
}

/// Top-level error that wraps all crate-specific errors.
///
/// Handlers return `Result<_, MatchforgeError>`; the `#[from]` impls let
/// `?` lift lobby, protocol, and auth errors, and [`IntoResponse`] turns
/// each variant into the matching status code and JSON body.
#[derive(Debug, thiserror::Error)]
pub enum MatchforgeError {
    /// A matchmaking rule rejected the request.
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// A path, query, or cookie value could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The player could not be identified.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The player tried to act on a room they are not part of.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The browser has no resumable local session.
    #[error("no local session: {0}")]
    NoLocalSession(String),

    /// Binding or serving the listener failed.
    #[error("server i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

impl MatchforgeError {
    /// The HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Lobby(e) => match e {
                LobbyError::AlreadyActive { .. } | LobbyError::DuplicateRoomId { .. } => {
                    StatusCode::CONFLICT
                }
                LobbyError::RoomNotFound { .. } | LobbyError::NoOpenRoom => {
                    StatusCode::NOT_FOUND
                }
                LobbyError::Tournament(_) => StatusCode::BAD_REQUEST,
            },
            Self::Protocol(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NoLocalSession(_) => StatusCode::NOT_FOUND,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MatchforgeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(error = %message, "request failed");
        } else {
            tracing::debug!(%status, error = %message, "request rejected");
        }

        match self {
            Self::Lobby(LobbyError::AlreadyActive { .. }) => {
                (status, Json(ConflictReply::busy(message))).into_response()
            }
            Self::Lobby(LobbyError::DuplicateRoomId { .. }) => {
                (status, Json(ConflictReply::conflict(message))).into_response()
            }
            _ => (status, Json(ErrorReply { message })).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use matchforge_lobby::Role;
    use matchforge_protocol::PlayerIdentity;

    use super::*;

    #[test]
    fn test_from_lobby_error() {
        let err: MatchforgeError = LobbyError::NoOpenRoom.into();
        assert!(matches!(err, MatchforgeError::Lobby(_)));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_busy_is_conflict() {
        let err: MatchforgeError = LobbyError::AlreadyActive {
            identity: PlayerIdentity::new("alice"),
            role: Role::Invitee,
        }
        .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(err.to_string().contains("invited player"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err: MatchforgeError = ProtocolError::InvalidMessage("bad".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_from_auth_error() {
        let err: MatchforgeError = AuthError::MissingToken.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
