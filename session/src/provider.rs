//! Seams between the session manager and its environment.
//!
//! SYSTEM CONTEXT
//! ==============
//! In the browser, `client` implements [`IdentityProvider`] over redirects,
//! a hidden silent-check iframe and `fetch`, and [`Runtime`] over
//! `gloo-timers` and `spawn_local`. Tests implement both over tokio.
//!
//! Futures are not `Send`: the browser event loop is single-threaded.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;

use crate::tokens::TokenSet;

/// Failure talking to the identity provider. Never surfaced to page code;
/// the manager turns every variant into "unauthenticated" or "log in again".
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("identity provider unreachable: {0}")]
    Transport(String),
    #[error("identity provider rejected the request: {0}")]
    Rejected(String),
    #[error("callback state does not match the pending login")]
    StateMismatch,
    #[error("silent check timed out")]
    Timeout,
    #[error("malformed token response: {0}")]
    Malformed(String),
    #[error("no authenticated session")]
    NotAuthenticated,
    #[error("browser environment unavailable: {0}")]
    Environment(String),
}

/// OpenID-Connect provider operations the session manager depends on.
#[async_trait(?Send)]
pub trait IdentityProvider: Send + Sync {
    /// Detect an existing provider session without a visible redirect.
    /// `Ok(None)` means the provider answered "not logged in".
    async fn check_sso(&self) -> Result<Option<TokenSet>, ProviderError>;

    /// Exchange a refresh token for a fresh token set.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, ProviderError>;

    /// Start the interactive redirect login. Navigates away on success.
    fn login(&self) -> Result<(), ProviderError>;

    /// End the provider session and return to the application origin.
    fn logout(&self, id_token_hint: Option<&str>) -> Result<(), ProviderError>;
}

/// Clock, timer and task spawner for the refresh schedule.
pub trait Runtime: Send + Sync {
    /// Seconds since the Unix epoch.
    fn now(&self) -> i64;

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;

    /// Run a task to completion on the current event loop.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}
