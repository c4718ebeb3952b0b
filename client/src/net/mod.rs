//! Networking modules for the catalog REST API and the identity provider.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls with bearer tokens, `keycloak` implements the
//! browser side of the OIDC login flow for the session manager.

pub mod api;
pub mod keycloak;
