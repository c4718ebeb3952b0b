//! Bearer-token verification against the identity provider's JWKS.
//!
//! DESIGN
//! ======
//! Signing keys are fetched from the provider's certs endpoint and cached by
//! `kid`. A token whose `kid` is not cached triggers one refetch (rotation),
//! throttled so garbage key ids cannot hammer the provider. Refetches are
//! single-flight: concurrent misses wait for the fetch in progress and then
//! re-read the cache. Tokens must be
//! RS256, unexpired and issued by the configured realm. Audience is not
//! checked: the provider issues access tokens for its own `account` audience.

#[cfg(test)]
#[path = "jwks_test.rs"]
mod jwks_test;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{Jwk, PublicKeyUse};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use session::{ProviderConfig, TokenClaims};

/// Minimum spacing between JWKS fetches triggered by unknown key ids.
const REFETCH_INTERVAL: Duration = Duration::from_secs(10);

/// Subject reported for every request when verification is bypassed.
pub const BYPASS_SUBJECT: &str = "local-dev";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("no signing key for kid {0:?}")]
    UnknownKey(Option<String>),
    #[error("jwks fetch failed: {0}")]
    Jwks(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::InvalidToken(err.to_string())
    }
}

/// Authenticated caller resolved from a verified token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl Identity {
    fn from_claims(claims: TokenClaims) -> Result<Self, AuthError> {
        let name = claims.display_name().map(str::to_owned);
        let subject = claims
            .sub
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AuthError::InvalidToken("missing sub".into()))?;
        Ok(Self { subject, email: claims.email, name })
    }

    fn bypass() -> Self {
        Self { subject: BYPASS_SUBJECT.to_owned(), email: None, name: Some("Desenvolvimento".to_owned()) }
    }
}

/// Extract signature keys from a JWKS document, keyed by `kid`.
///
/// Keys are parsed one by one so an entry this library cannot represent
/// (e.g. an encryption key with an unfamiliar algorithm) does not hide the rest.
pub(crate) fn signing_keys(document: &serde_json::Value) -> HashMap<String, DecodingKey> {
    let Some(entries) = document.get("keys").and_then(serde_json::Value::as_array) else {
        return HashMap::new();
    };
    entries
        .iter()
        .filter_map(|entry| serde_json::from_value::<Jwk>(entry.clone()).ok())
        .filter(|jwk| !matches!(jwk.common.public_key_use, Some(ref u) if *u != PublicKeyUse::Signature))
        .filter_map(|jwk| {
            let kid = jwk.common.key_id.clone()?;
            let key = DecodingKey::from_jwk(&jwk).ok()?;
            Some((kid, key))
        })
        .collect()
}

pub struct TokenVerifier {
    config: ProviderConfig,
    bypass: bool,
    http: reqwest::Client,
    keys: RwLock<HashMap<String, DecodingKey>>,
    last_fetch: Mutex<Option<Instant>>,
    refresh_lock: tokio::sync::Mutex<()>,
}

impl TokenVerifier {
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            bypass: false,
            http: reqwest::Client::new(),
            keys: RwLock::new(HashMap::new()),
            last_fetch: Mutex::new(None),
            refresh_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Verifier that accepts every request as [`BYPASS_SUBJECT`].
    #[must_use]
    pub fn bypass(config: ProviderConfig) -> Self {
        Self { bypass: true, ..Self::new(config) }
    }

    #[must_use]
    pub fn is_bypass(&self) -> bool {
        self.bypass
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.config.issuer()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_aud = false;
        validation
    }

    fn cached_key(&self, kid: &str) -> Option<DecodingKey> {
        self.keys.read().unwrap_or_else(PoisonError::into_inner).get(kid).cloned()
    }

    fn refetch_allowed(&self, now: Instant) -> bool {
        let mut last = self.last_fetch.lock().unwrap_or_else(PoisonError::into_inner);
        match *last {
            Some(at) if now.duration_since(at) < REFETCH_INTERVAL => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }

    async fn refresh_keys(&self) -> Result<(), AuthError> {
        let url = self.config.jwks_endpoint();
        let document = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AuthError::Jwks(e.to_string()))?
            .json::<serde_json::Value>()
            .await
            .map_err(|e| AuthError::Jwks(e.to_string()))?;
        let keys = signing_keys(&document);
        tracing::info!(%url, count = keys.len(), "jwks refreshed");
        *self.keys.write().unwrap_or_else(PoisonError::into_inner) = keys;
        Ok(())
    }

    async fn key_for(&self, kid: Option<String>) -> Result<DecodingKey, AuthError> {
        let Some(kid) = kid else {
            return Err(AuthError::UnknownKey(None));
        };
        if let Some(key) = self.cached_key(&kid) {
            return Ok(key);
        }
        let _fetching = self.refresh_lock.lock().await;
        if let Some(key) = self.cached_key(&kid) {
            return Ok(key);
        }
        if self.refetch_allowed(Instant::now()) {
            self.refresh_keys().await?;
        }
        self.cached_key(&kid).ok_or(AuthError::UnknownKey(Some(kid)))
    }

    /// Verify a compact JWT and resolve the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the token is malformed, expired, issued by
    /// another realm, signed by an unknown key, or the JWKS cannot be fetched.
    pub async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        if self.bypass {
            return Ok(Identity::bypass());
        }
        let header = jsonwebtoken::decode_header(token)?;
        let key = self.key_for(header.kid).await?;
        let data = jsonwebtoken::decode::<TokenClaims>(token, &key, &self.validation())?;
        Identity::from_claims(data.claims)
    }

    #[cfg(test)]
    fn insert_key(&self, kid: &str, key: DecodingKey) {
        self.keys.write().unwrap_or_else(PoisonError::into_inner).insert(kid.to_owned(), key);
    }
}
