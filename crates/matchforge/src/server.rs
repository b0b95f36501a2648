//! `MatchforgeServer` builder and server loop.
//!
//! This is the entry point for running a Matchforge lobby. It ties
//! together all the layers: HTTP → authenticator → matchmaker → rooms.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, post};
use matchforge_lobby::Matchmaker;
use matchforge_tournament::TournamentDirectory;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::handler;
use crate::{Authenticator, CookiePolicy, MatchforgeError};

/// Shared server state passed to every request handler.
///
/// Wrapped in `Arc` so axum can clone it per request. The matchmaker sits
/// behind a single lock: a presence check and the registry write that
/// follows it always happen under the same acquisition.
pub(crate) struct AppState<T, A> {
    pub(crate) lobby: Mutex<Matchmaker<T>>,
    pub(crate) auth: A,
    pub(crate) cookies: CookiePolicy,
}

/// Builder for configuring and starting a Matchforge server.
///
/// # Example
///
/// ```rust,ignore
/// use matchforge::prelude::*;
///
/// let server = MatchforgeServer::builder()
///     .bind("0.0.0.0:8080")
///     .build(my_auth, Arc::new(TournamentBoard::new()))
///     .await?;
/// server.run().await
/// ```
pub struct MatchforgeServerBuilder {
    bind_addr: String,
    cookie_policy: CookiePolicy,
}

impl MatchforgeServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            cookie_policy: CookiePolicy::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the attributes of the local-session cookies.
    pub fn cookie_policy(mut self, policy: CookiePolicy) -> Self {
        self.cookie_policy = policy;
        self
    }

    /// Builds the routes without binding a socket.
    ///
    /// Useful for driving the service in-process, e.g. with
    /// `tower::ServiceExt::oneshot`.
    pub fn router<T, A>(self, auth: A, tournaments: Arc<T>) -> Router
    where
        T: TournamentDirectory,
        A: Authenticator,
    {
        let state = Arc::new(AppState {
            lobby: Mutex::new(Matchmaker::new(tournaments)),
            auth,
            cookies: self.cookie_policy,
        });

        Router::new()
            .route(
                "/games/remote",
                post(handler::enter_remote::<T, A>).get(handler::reenter_remote::<T, A>),
            )
            .route("/games/remote/{id}", delete(handler::abandon_remote::<T, A>))
            .route("/games/remote/{id}/result", post(handler::remote_result::<T, A>))
            .route("/games/custom", post(handler::create_custom::<T, A>))
            .route("/games/custom/{id}", delete(handler::cancel_custom::<T, A>))
            .route("/games/custom/{id}/result", post(handler::custom_result::<T, A>))
            .route(
                "/games/local",
                post(handler::create_local::<T, A>).get(handler::resume_local::<T, A>),
            )
            .route(
                "/tournaments/local",
                post(handler::create_local_tournament::<T, A>)
                    .get(handler::resume_local_tournament::<T, A>),
            )
            .with_state(state)
    }

    /// Binds the listener and assembles the service.
    pub async fn build<T, A>(
        self,
        auth: A,
        tournaments: Arc<T>,
    ) -> Result<MatchforgeServer, MatchforgeError>
    where
        T: TournamentDirectory,
        A: Authenticator,
    {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        let router = self.router(auth, tournaments);
        Ok(MatchforgeServer { listener, router })
    }
}

impl Default for MatchforgeServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Matchforge server.
///
/// Call [`run()`](Self::run) to start serving requests.
pub struct MatchforgeServer {
    listener: TcpListener,
    router: Router,
}

impl MatchforgeServer {
    /// Creates a new builder.
    pub fn builder() -> MatchforgeServerBuilder {
        MatchforgeServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until the process is terminated.
    pub async fn run(self) -> Result<(), MatchforgeError> {
        tracing::info!(addr = ?self.listener.local_addr().ok(), "Matchforge server running");
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }
}
