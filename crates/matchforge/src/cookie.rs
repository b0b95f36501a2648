//! Session-affinity cookies for local games and tournaments.
//!
//! A local session has no player identity. The browser that created it
//! gets a cookie carrying the session id, and later requests from that
//! browser are matched to the in-memory room or tournament by that id
//! alone.

use std::fmt;

use axum::http::{HeaderMap, header};
use matchforge_protocol::{GameId, ProtocolError, TournamentId};

/// Cookie naming the browser's local game.
pub const LOCAL_GAME_COOKIE: &str = "localGameId";

/// Cookie naming the browser's local tournament.
pub const LOCAL_TOURNAMENT_COOKIE: &str = "localTournamentId";

/// The `SameSite` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "Strict"),
            Self::Lax => write!(f, "Lax"),
            Self::None => write!(f, "None"),
        }
    }
}

/// Attributes applied to every session-affinity cookie.
///
/// The default is `Path=/; SameSite=None; Secure; HttpOnly`: visible to the
/// whole origin, sent on cross-site requests, never readable by scripts.
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    pub path: String,
    pub same_site: SameSite,
    pub secure: bool,
    pub http_only: bool,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            same_site: SameSite::None,
            secure: true,
            http_only: true,
        }
    }
}

impl CookiePolicy {
    /// Renders a `Set-Cookie` header value.
    pub fn set_cookie(&self, name: &str, value: &str) -> String {
        let mut out = format!(
            "{name}={value}; Path={}; SameSite={}",
            self.path, self.same_site
        );
        if self.secure {
            out.push_str("; Secure");
        }
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        out
    }

    /// `localGameId` carries the id in decimal.
    pub fn local_game(&self, id: GameId) -> String {
        self.set_cookie(LOCAL_GAME_COOKIE, &id.0.to_string())
    }

    /// `localTournamentId` carries the id JSON-encoded.
    pub fn local_tournament(&self, id: TournamentId) -> Result<String, ProtocolError> {
        let value = serde_json::to_string(&id).map_err(ProtocolError::Encode)?;
        Ok(self.set_cookie(LOCAL_TOURNAMENT_COOKIE, &value))
    }
}

/// Returns the value of cookie `name` from the request headers.
pub(crate) fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

/// Reads the local game id, if the browser sent one.
pub(crate) fn local_game_id(headers: &HeaderMap) -> Option<Result<GameId, ProtocolError>> {
    read_cookie(headers, LOCAL_GAME_COOKIE).map(str::parse)
}

/// Reads the local tournament id, if the browser sent one.
pub(crate) fn local_tournament_id(
    headers: &HeaderMap,
) -> Option<Result<TournamentId, ProtocolError>> {
    read_cookie(headers, LOCAL_TOURNAMENT_COOKIE)
        .map(|v| serde_json::from_str(v).map_err(ProtocolError::Decode))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_default_policy_attributes() {
        let cookie = CookiePolicy::default().local_game(GameId(12));
        assert_eq!(cookie, "localGameId=12; Path=/; SameSite=None; Secure; HttpOnly");
    }

    #[test]
    fn test_tournament_cookie_is_json_encoded() {
        let cookie = CookiePolicy::default()
            .local_tournament(TournamentId(4))
            .unwrap();
        assert!(cookie.starts_with("localTournamentId=4; "));
    }

    #[test]
    fn test_read_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; localGameId=77; localTournamentId=3"),
        );

        assert_eq!(read_cookie(&headers, "theme"), Some("dark"));
        assert_eq!(local_game_id(&headers).unwrap().unwrap(), GameId(77));
        assert_eq!(local_tournament_id(&headers).unwrap().unwrap(), TournamentId(3));
        assert!(read_cookie(&headers, "missing").is_none());
    }

    #[test]
    fn test_tampered_cookie_is_a_protocol_error() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("localGameId=abc; localTournamentId={"),
        );
        assert!(local_game_id(&headers).unwrap().is_err());
        assert!(matches!(
            local_tournament_id(&headers).unwrap(),
            Err(ProtocolError::Decode(_))
        ));
    }
}
