//! Token sets returned by the provider and the claims the console reads.
//!
//! DESIGN
//! ======
//! Claims are decoded without signature verification, the same way a
//! browser identity client exposes `tokenParsed`. They only drive display
//! (name, email) and the refresh schedule (`exp`); the API server performs the
//! real verification against the provider's JWKS.

#[cfg(test)]
#[path = "tokens_test.rs"]
mod tokens_test;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

/// Subset of OIDC access/id-token claims used by the console.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiry as seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ClaimsError {
    #[error("token is not a three-part JWT")]
    Shape,
    #[error("token payload is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl TokenClaims {
    /// Decode the payload segment of a compact JWT.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError`] if the token does not have three segments or the
    /// payload is not base64url-encoded JSON.
    pub fn decode(token: &str) -> Result<Self, ClaimsError> {
        let mut segments = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) =
            (segments.next(), segments.next(), segments.next(), segments.next())
        else {
            return Err(ClaimsError::Shape);
        };
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `name`, falling back to `preferred_username`.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.preferred_username.as_deref())
    }
}

/// Tokens held for an authenticated session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub claims: TokenClaims,
}

impl TokenSet {
    /// Build a token set, reading claims from the access token and filling
    /// missing profile fields from the id token.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError`] if the access token cannot be decoded.
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        id_token: Option<String>,
    ) -> Result<Self, ClaimsError> {
        let mut claims = TokenClaims::decode(&access_token)?;
        if let Some(id_claims) = id_token.as_deref().and_then(|t| TokenClaims::decode(t).ok()) {
            claims.email = claims.email.or(id_claims.email);
            claims.name = claims.name.or(id_claims.name);
            claims.preferred_username = claims.preferred_username.or(id_claims.preferred_username);
        }
        Ok(Self { access_token, refresh_token, id_token, claims })
    }

    /// A token without an `exp` claim is never considered expired.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.claims.exp.is_some_and(|exp| exp <= now)
    }

    /// True when fewer than `min_validity` seconds remain before expiry.
    #[must_use]
    pub fn expires_within(&self, now: i64, min_validity: i64) -> bool {
        self.claims.exp.is_some_and(|exp| exp - now < min_validity)
    }
}
