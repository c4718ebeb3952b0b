//! Browser session lifecycle against an OpenID-Connect identity provider.
//!
//! This crate owns the authentication state shared by every screen of the
//! inventory console: the single-shot silent SSO check, the periodic token
//! refresh, and the per-view login gate. It is platform-agnostic; the
//! browser-specific provider and timers live in `client` and plug in through
//! the [`IdentityProvider`] and [`Runtime`] traits.
//!
//! ARCHITECTURE
//! ============
//! - [`config`] derives provider endpoints from base URL + realm + client id.
//! - [`pkce`] and [`oidc`] build authorization, token and logout requests.
//! - [`tokens`] decodes access-token claims and tracks expiry.
//! - [`manager`] is the long-lived [`SessionManager`] handle.
//! - [`gate`] is the trigger-once login gate used by protected views.

pub mod config;
pub mod gate;
pub mod manager;
pub mod oidc;
pub mod pkce;
pub mod provider;
pub mod tokens;

pub use config::ProviderConfig;
pub use gate::{AccessGate, GateDecision};
pub use manager::{MIN_TOKEN_VALIDITY_SECS, Phase, REFRESH_INTERVAL, Session, SessionManager};
pub use provider::{IdentityProvider, ProviderError, Runtime};
pub use tokens::{TokenClaims, TokenSet};
