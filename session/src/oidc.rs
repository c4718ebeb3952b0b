//! Authorization-code + PKCE request building and callback parsing.
//!
//! DESIGN
//! ======
//! Everything here is string-in/string-out so the browser provider only has
//! to move bytes: build a URL, navigate or load it in an iframe, read the
//! resulting URL back, post a form to the token endpoint.
//!
//! Callback parameters arrive in the URL fragment (`response_mode=fragment`)
//! so they never reach the server's access logs.

#[cfg(test)]
#[path = "oidc_test.rs"]
mod oidc_test;

use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::provider::ProviderError;
use crate::tokens::TokenSet;

/// Same-origin page loaded in the hidden iframe during the silent check.
pub const SILENT_CHECK_PATH: &str = "/silent-check-sso.html";

const CALLBACK_KEYS: &[&str] = &["code", "state", "session_state", "iss", "error", "error_description"];

/// Provider errors that only mean "an interactive login is needed".
const LOGIN_REQUIRED_ERRORS: &[&str] = &[
    "login_required",
    "interaction_required",
    "consent_required",
    "account_selection_required",
];

/// Parameters of one authorization request.
#[derive(Clone, Copy, Debug)]
pub struct AuthorizeRequest<'a> {
    pub redirect_uri: &'a str,
    pub state: &'a str,
    pub code_challenge: &'a str,
    /// `prompt=none` for the silent check.
    pub silent: bool,
}

/// Build the provider authorization URL.
#[must_use]
pub fn authorize_url(config: &ProviderConfig, request: AuthorizeRequest<'_>) -> String {
    let mut pairs = vec![
        ("client_id", config.client_id.as_str()),
        ("redirect_uri", request.redirect_uri),
        ("state", request.state),
        ("nonce", request.state),
        ("response_mode", "fragment"),
        ("response_type", "code"),
        ("scope", "openid"),
        ("code_challenge", request.code_challenge),
        ("code_challenge_method", "S256"),
    ];
    if request.silent {
        pairs.push(("prompt", "none"));
    }
    format!("{}?{}", config.authorization_endpoint(), encode_pairs(&pairs))
}

/// Build the end-session URL that returns to `post_logout_redirect_uri`.
#[must_use]
pub fn logout_url(config: &ProviderConfig, post_logout_redirect_uri: &str, id_token_hint: Option<&str>) -> String {
    let mut pairs = vec![
        ("client_id", config.client_id.as_str()),
        ("post_logout_redirect_uri", post_logout_redirect_uri),
    ];
    if let Some(hint) = id_token_hint {
        pairs.push(("id_token_hint", hint));
    }
    format!("{}?{}", config.end_session_endpoint(), encode_pairs(&pairs))
}

/// Form body for the authorization-code grant.
#[must_use]
pub fn code_exchange_form(config: &ProviderConfig, code: &str, redirect_uri: &str, code_verifier: &str) -> String {
    encode_pairs(&[
        ("grant_type", "authorization_code"),
        ("client_id", config.client_id.as_str()),
        ("code", code),
        ("redirect_uri", redirect_uri),
        ("code_verifier", code_verifier),
    ])
}

/// Form body for the refresh-token grant.
#[must_use]
pub fn refresh_form(config: &ProviderConfig, refresh_token: &str) -> String {
    encode_pairs(&[
        ("grant_type", "refresh_token"),
        ("client_id", config.client_id.as_str()),
        ("refresh_token", refresh_token),
    ])
}

fn encode_pairs(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Token endpoint response body.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// # Errors
    ///
    /// Returns [`ProviderError::Malformed`] if the access token has no readable claims.
    pub fn into_token_set(self) -> Result<TokenSet, ProviderError> {
        TokenSet::new(self.access_token, self.refresh_token, self.id_token)
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

/// What the provider sent back to a redirect URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Callback {
    Code { code: String, state: String },
    Error { error: String, description: Option<String>, state: Option<String> },
}

impl Callback {
    /// Check the echoed `state` against the one stored before the redirect.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::StateMismatch`] if the values differ.
    pub fn verify_state(&self, expected: Option<&str>) -> Result<(), ProviderError> {
        let echoed = match self {
            Self::Code { state, .. } => Some(state.as_str()),
            Self::Error { state, .. } => state.as_deref(),
        };
        match (echoed, expected) {
            (Some(echoed), Some(expected)) if echoed == expected => Ok(()),
            _ => Err(ProviderError::StateMismatch),
        }
    }

    /// True for error callbacks that just mean "no provider session".
    #[must_use]
    pub fn is_login_required(&self) -> bool {
        matches!(self, Self::Error { error, .. } if LOGIN_REQUIRED_ERRORS.contains(&error.as_str()))
    }
}

/// Parse callback parameters from a URL fragment, falling back to the query.
#[must_use]
pub fn parse_callback(url: &str) -> Option<Callback> {
    let (before_fragment, fragment) = match url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (url, None),
    };
    let query = before_fragment.split_once('?').map(|(_, q)| q);

    fragment
        .and_then(callback_from_params)
        .or_else(|| query.and_then(callback_from_params))
}

fn callback_from_params(params: &str) -> Option<Callback> {
    let pairs = decode_params(params);
    let get = |key: &str| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone());

    if let Some(error) = get("error") {
        return Some(Callback::Error { error, description: get("error_description"), state: get("state") });
    }
    match (get("code"), get("state")) {
        (Some(code), Some(state)) => Some(Callback::Code { code, state }),
        _ => None,
    }
}

fn decode_params(params: &str) -> Vec<(String, String)> {
    params
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(k), decode_component(v))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or(spaced.clone(), std::borrow::Cow::into_owned)
}

/// Remove callback parameters from a URL so a reload does not replay them.
#[must_use]
pub fn strip_callback_params(url: &str) -> String {
    let (before_fragment, fragment) = match url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (url, None),
    };
    let (base, query) = match before_fragment.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (before_fragment, None),
    };

    let mut out = base.to_owned();
    if let Some(query) = query.map(retain_non_callback).filter(|q| !q.is_empty()) {
        out.push('?');
        out.push_str(&query);
    }
    if let Some(fragment) = fragment.map(retain_non_callback).filter(|f| !f.is_empty()) {
        out.push('#');
        out.push_str(&fragment);
    }
    out
}

fn retain_non_callback(params: &str) -> String {
    params
        .split('&')
        .filter(|pair| {
            let key = pair.split_once('=').map_or(*pair, |(k, _)| k);
            !pair.is_empty() && !CALLBACK_KEYS.contains(&key)
        })
        .collect::<Vec<_>>()
        .join("&")
}
