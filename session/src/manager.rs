//! Long-lived session handle: initialization latch, refresh schedule, login/logout.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionManager` is built per browser tab and handed to every screen.
//! Views re-mount freely (strict re-rendering, route changes); the manager does
//! not, so its latch survives them.
//!
//! DESIGN
//! ======
//! - The initialization latch is a three-state atomic
//!   (`Uninitialized -> Initializing -> Settled`). `initialize()` performs the
//!   compare-and-swap when it is *called*, before returning its future, so two
//!   callers in the same turn cannot both win.
//! - The public [`Session`] is derived from the stored token set on every read.
//!   An access token past its `exp` is never handed out.
//! - The refresh loop is tied to the session: it stops once the session is no
//!   longer authenticated (logout, failed refresh).
//!
//! ERROR HANDLING
//! ==============
//! Provider errors stop here. Initialization failure settles unauthenticated;
//! refresh failure clears the tokens and starts one interactive login.

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::provider::{IdentityProvider, ProviderError, Runtime};
use crate::tokens::TokenSet;

/// Interval between token freshness checks.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// A token with less than this many seconds left is refreshed.
pub const MIN_TOKEN_VALIDITY_SECS: i64 = 60;

const UNINITIALIZED: u8 = 0;
const INITIALIZING: u8 = 1;
const SETTLED: u8 = 2;

/// Initialization state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initializing,
    Settled,
}

impl Phase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            UNINITIALIZED => Self::Uninitialized,
            INITIALIZING => Self::Initializing,
            _ => Self::Settled,
        }
    }
}

/// Authentication state as seen by views.
///
/// While `initializing` is true, `authenticated` carries no meaning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub initializing: bool,
    pub access_token: Option<String>,
    pub subject_name: Option<String>,
    pub subject_email: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            authenticated: false,
            initializing: true,
            access_token: None,
            subject_name: None,
            subject_email: None,
        }
    }
}

impl Session {
    fn derive(phase: Phase, tokens: Option<&TokenSet>, now: i64) -> Self {
        let initializing = phase != Phase::Settled;
        match tokens {
            Some(tokens) => Self {
                authenticated: !initializing,
                initializing,
                access_token: (!tokens.is_expired(now)).then(|| tokens.access_token.clone()),
                subject_name: tokens.claims.display_name().map(str::to_owned),
                subject_email: tokens.claims.email.clone(),
            },
            None => Self { initializing, ..Self::default() },
        }
    }
}

type Listener = Box<dyn Fn(&Session) + Send + Sync>;

struct Inner {
    phase: AtomicU8,
    refresh_scheduled: AtomicBool,
    tokens: RwLock<Option<TokenSet>>,
    listeners: RwLock<Vec<Listener>>,
    provider: Arc<dyn IdentityProvider>,
    runtime: Arc<dyn Runtime>,
}

/// Cheap-clone handle to the tab's session.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, runtime: Arc<dyn Runtime>) -> Self {
        Self {
            inner: Arc::new(Inner {
                phase: AtomicU8::new(UNINITIALIZED),
                refresh_scheduled: AtomicBool::new(false),
                tokens: RwLock::new(None),
                listeners: RwLock::new(Vec::new()),
                provider,
                runtime,
            }),
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.inner.phase.load(Ordering::Acquire))
    }

    /// Run the silent SSO check once per manager.
    ///
    /// The latch is claimed synchronously; every call after the first returns
    /// a future that completes immediately without touching the provider.
    pub fn initialize(&self) -> impl Future<Output = ()> + 'static {
        let claimed = self
            .inner
            .phase
            .compare_exchange(UNINITIALIZED, INITIALIZING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        let this = self.clone();
        async move {
            if !claimed {
                return;
            }
            let tokens = match this.inner.provider.check_sso().await {
                Ok(tokens) => tokens,
                Err(e) => {
                    log::warn!("silent SSO check failed, continuing unauthenticated: {e}");
                    None
                }
            };
            let authenticated = tokens.is_some();
            *this.write_tokens() = tokens;
            this.inner.phase.store(SETTLED, Ordering::Release);
            this.publish();

            if authenticated {
                log::info!("session authenticated");
                this.schedule_refresh();
            }
        }
    }

    /// Start the periodic refresh loop. No-op unless authenticated, and
    /// while a loop is already running.
    pub fn schedule_refresh(&self) {
        if !self.snapshot().authenticated {
            return;
        }
        if self.inner.refresh_scheduled.swap(true, Ordering::AcqRel) {
            return;
        }
        let this = self.clone();
        self.inner.runtime.spawn(Box::pin(async move { this.refresh_loop().await }));
    }

    async fn refresh_loop(self) {
        loop {
            self.inner.runtime.sleep(REFRESH_INTERVAL).await;
            if !self.snapshot().authenticated {
                break;
            }
            if let Err(e) = self.update_token(MIN_TOKEN_VALIDITY_SECS).await {
                // A logout during the grant already cleared the session.
                if self.write_tokens().take().is_none() {
                    log::debug!("token refresh failed after logout: {e}");
                    break;
                }
                log::warn!("token refresh failed, starting login: {e}");
                self.publish();
                self.login();
                break;
            }
        }
        self.inner.refresh_scheduled.store(false, Ordering::Release);
    }

    /// Refresh the token set if it expires within `min_validity` seconds.
    /// Returns whether a refresh happened. A grant that completes after
    /// [`SessionManager::logout`] is discarded and reports `false`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotAuthenticated`] without a refresh token, or
    /// the provider's error if the refresh grant fails.
    pub async fn update_token(&self, min_validity: i64) -> Result<bool, ProviderError> {
        let now = self.inner.runtime.now();
        let refresh_token = {
            let tokens = self.read_tokens();
            let Some(current) = tokens.as_ref() else {
                return Err(ProviderError::NotAuthenticated);
            };
            if !current.expires_within(now, min_validity) {
                return Ok(false);
            }
            current.refresh_token.clone().ok_or(ProviderError::NotAuthenticated)?
        };

        let mut fresh = self.inner.provider.refresh(&refresh_token).await?;
        {
            let mut tokens = self.write_tokens();
            let Some(current) = tokens.as_ref() else {
                log::debug!("discarding refreshed tokens after logout");
                return Ok(false);
            };
            if fresh.id_token.is_none() {
                fresh.id_token = current.id_token.clone();
            }
            if fresh.refresh_token.is_none() {
                fresh.refresh_token = Some(refresh_token);
            }
            *tokens = Some(fresh);
        }
        log::debug!("access token refreshed");
        self.publish();
        Ok(true)
    }

    /// Redirect to the provider's interactive login.
    pub fn login(&self) {
        if let Err(e) = self.inner.provider.login() {
            log::warn!("login redirect failed: {e}");
        }
    }

    /// Drop local tokens and redirect to the provider's logout.
    pub fn logout(&self) {
        let id_token = self.write_tokens().take().and_then(|t| t.id_token);
        self.publish();
        if let Err(e) = self.inner.provider.logout(id_token.as_deref()) {
            log::warn!("logout redirect failed: {e}");
        }
    }

    /// Current bearer token, if present and not past its expiry.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.snapshot().access_token
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        let now = self.inner.runtime.now();
        Session::derive(self.phase(), self.read_tokens().as_ref(), now)
    }

    /// Register a callback run after every session change.
    pub fn subscribe(&self, listener: impl Fn(&Session) + Send + Sync + 'static) {
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(listener));
    }

    fn publish(&self) {
        let session = self.snapshot();
        let listeners = self.inner.listeners.read().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(&session);
        }
    }

    fn read_tokens(&self) -> RwLockReadGuard<'_, Option<TokenSet>> {
        self.inner.tokens.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tokens(&self) -> RwLockWriteGuard<'_, Option<TokenSet>> {
        self.inner.tokens.write().unwrap_or_else(PoisonError::into_inner)
    }
}
