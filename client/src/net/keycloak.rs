//! Browser identity provider for a Keycloak realm.
//!
//! SYSTEM CONTEXT
//! ==============
//! Implements `session::IdentityProvider` with the authorization-code + PKCE
//! flow. Interactive login and logout are full-page redirects. The silent
//! check loads the authorization endpoint with `prompt=none` in a hidden
//! iframe whose redirect target, `/silent-check-sso.html`, posts its own URL
//! back to this window.
//!
//! DESIGN
//! ======
//! The PKCE verifier and `state` for an interactive login survive the
//! redirect in `sessionStorage`. On the next page load `check_sso` finds the
//! callback in the URL, consumes the pending entry, strips the parameters
//! with `history.replaceState` and exchanges the code.
//!
//! ERROR HANDLING
//! ==============
//! Everything returns `ProviderError`; the session manager absorbs it. On the
//! server (SSR) every operation reports `ProviderError::Environment`.

#[cfg(test)]
#[path = "keycloak_test.rs"]
mod keycloak_test;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use session::config::{DEFAULT_CLIENT_ID, DEFAULT_REALM, DEFAULT_URL};
use session::{IdentityProvider, ProviderConfig, ProviderError, TokenSet};

#[cfg(any(test, feature = "hydrate"))]
use session::oidc::{Callback, SILENT_CHECK_PATH};

#[cfg(feature = "hydrate")]
const PENDING_LOGIN_KEY: &str = "inventory.oidc.pending";

#[cfg(feature = "hydrate")]
const SILENT_CHECK_TIMEOUT_MS: u32 = 10_000;

/// Provider coordinates baked in at build time.
#[must_use]
pub fn provider_config() -> ProviderConfig {
    ProviderConfig::new(
        option_env!("INVENTORY_OIDC_URL").unwrap_or(DEFAULT_URL),
        option_env!("INVENTORY_OIDC_REALM").unwrap_or(DEFAULT_REALM),
        option_env!("INVENTORY_OIDC_CLIENT_ID").unwrap_or(DEFAULT_CLIENT_ID),
    )
}

/// Verifier and state of an authorization request awaiting its callback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct PendingLogin {
    state: String,
    verifier: String,
    redirect_uri: String,
}

#[cfg_attr(not(any(test, feature = "hydrate")), allow(dead_code))]
impl PendingLogin {
    fn new(redirect_uri: String) -> Self {
        Self {
            state: session::pkce::generate_state(),
            verifier: session::pkce::generate_code_verifier(),
            redirect_uri,
        }
    }

    fn challenge(&self) -> String {
        session::pkce::code_challenge(&self.verifier)
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn silent_redirect_uri(origin: &str) -> String {
    format!("{}{SILENT_CHECK_PATH}", origin.trim_end_matches('/'))
}

/// Turn a callback into an authorization code, `None` for "not logged in",
/// or an error.
#[cfg(any(test, feature = "hydrate"))]
fn resolve_callback(callback: &Callback, pending: Option<&PendingLogin>) -> Result<Option<String>, ProviderError> {
    callback.verify_state(pending.map(|p| p.state.as_str()))?;
    match callback {
        Callback::Code { code, .. } => Ok(Some(code.clone())),
        Callback::Error { .. } if callback.is_login_required() => Ok(None),
        Callback::Error { error, description, .. } => {
            Err(ProviderError::Rejected(description.clone().unwrap_or_else(|| error.clone())))
        }
    }
}

/// `IdentityProvider` backed by browser redirects and `fetch`.
#[derive(Clone, Debug)]
pub struct BrowserProvider {
    config: ProviderConfig,
}

impl BrowserProvider {
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    #[cfg(feature = "hydrate")]
    async fn exchange(&self, code: &str, pending: &PendingLogin) -> Result<TokenSet, ProviderError> {
        let form = session::oidc::code_exchange_form(&self.config, code, &pending.redirect_uri, &pending.verifier);
        browser::post_token_form(&self.config.token_endpoint(), form).await
    }

    #[cfg(feature = "hydrate")]
    fn authorize(&self, pending: &PendingLogin, silent: bool) -> String {
        let challenge = pending.challenge();
        session::oidc::authorize_url(
            &self.config,
            session::oidc::AuthorizeRequest {
                redirect_uri: &pending.redirect_uri,
                state: &pending.state,
                code_challenge: &challenge,
                silent,
            },
        )
    }
}

impl Default for BrowserProvider {
    fn default() -> Self {
        Self::new(provider_config())
    }
}

#[async_trait(?Send)]
impl IdentityProvider for BrowserProvider {
    async fn check_sso(&self) -> Result<Option<TokenSet>, ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            use session::oidc::{parse_callback, strip_callback_params};

            // Returning from an interactive login.
            let href = browser::current_href()?;
            if let Some(callback) = parse_callback(&href) {
                if let Err(e) = browser::replace_url(&strip_callback_params(&href)) {
                    log::warn!("could not clear login callback from URL: {e}");
                }
                let pending = browser::take_pending();
                return match (resolve_callback(&callback, pending.as_ref())?, pending) {
                    (Some(code), Some(pending)) => self.exchange(&code, &pending).await.map(Some),
                    (Some(_), None) => Err(ProviderError::StateMismatch),
                    (None, _) => Ok(None),
                };
            }

            let origin = browser::origin()?;
            let pending = PendingLogin::new(silent_redirect_uri(&origin));
            let landed = browser::silent_probe(&self.authorize(&pending, true), &origin, &pending.redirect_uri).await?;
            let callback = parse_callback(&landed)
                .ok_or_else(|| ProviderError::Malformed("silent check returned no callback".to_owned()))?;
            match resolve_callback(&callback, Some(&pending))? {
                Some(code) => self.exchange(&code, &pending).await.map(Some),
                None => Ok(None),
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ProviderError::Environment("silent check requires a browser".to_owned()))
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            let form = session::oidc::refresh_form(&self.config, refresh_token);
            browser::post_token_form(&self.config.token_endpoint(), form).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = refresh_token;
            Err(ProviderError::Environment("token refresh requires a browser".to_owned()))
        }
    }

    fn login(&self) -> Result<(), ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            let href = browser::current_href()?;
            let pending = PendingLogin::new(session::oidc::strip_callback_params(&href));
            browser::save_pending(&pending)?;
            browser::navigate(&self.authorize(&pending, false))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ProviderError::Environment("login requires a browser".to_owned()))
        }
    }

    fn logout(&self, id_token_hint: Option<&str>) -> Result<(), ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            let origin = browser::origin()?;
            browser::navigate(&session::oidc::logout_url(&self.config, &origin, id_token_hint))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = id_token_hint;
            Err(ProviderError::Environment("logout requires a browser".to_owned()))
        }
    }
}

#[cfg(feature = "hydrate")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::future::Either;
    use session::oidc::TokenResponse;
    use session::{ProviderError, TokenSet};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::JsValue;
    use wasm_bindgen::closure::Closure;

    use super::{PENDING_LOGIN_KEY, PendingLogin, SILENT_CHECK_TIMEOUT_MS};

    fn js_err(e: JsValue) -> ProviderError {
        ProviderError::Environment(format!("{e:?}"))
    }

    fn window() -> Result<web_sys::Window, ProviderError> {
        web_sys::window().ok_or_else(|| ProviderError::Environment("no window".to_owned()))
    }

    fn storage() -> Result<web_sys::Storage, ProviderError> {
        window()?
            .session_storage()
            .map_err(js_err)?
            .ok_or_else(|| ProviderError::Environment("sessionStorage unavailable".to_owned()))
    }

    pub(super) fn current_href() -> Result<String, ProviderError> {
        window()?.location().href().map_err(js_err)
    }

    pub(super) fn origin() -> Result<String, ProviderError> {
        window()?.location().origin().map_err(js_err)
    }

    pub(super) fn navigate(url: &str) -> Result<(), ProviderError> {
        window()?.location().set_href(url).map_err(js_err)
    }

    pub(super) fn replace_url(url: &str) -> Result<(), ProviderError> {
        window()?
            .history()
            .map_err(js_err)?
            .replace_state_with_url(&JsValue::NULL, "", Some(url))
            .map_err(js_err)
    }

    pub(super) fn save_pending(pending: &PendingLogin) -> Result<(), ProviderError> {
        let raw = serde_json::to_string(pending).map_err(|e| ProviderError::Environment(e.to_string()))?;
        storage()?.set_item(PENDING_LOGIN_KEY, &raw).map_err(js_err)
    }

    /// Read and remove the pending login.
    pub(super) fn take_pending() -> Option<PendingLogin> {
        let storage = storage().ok()?;
        let raw = storage.get_item(PENDING_LOGIN_KEY).ok()??;
        let _ = storage.remove_item(PENDING_LOGIN_KEY);
        serde_json::from_str(&raw).ok()
    }

    pub(super) async fn post_token_form(endpoint: &str, form: String) -> Result<TokenSet, ProviderError> {
        let resp = gloo_net::http::Request::post(endpoint)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(form)
            .map_err(|e| ProviderError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        if !resp.ok() {
            return Err(ProviderError::Rejected(format!("token endpoint returned {}", resp.status())));
        }
        let body: TokenResponse = resp.json().await.map_err(|e| ProviderError::Malformed(e.to_string()))?;
        body.into_token_set()
    }

    /// Load `url` in a hidden iframe and wait for the silent-check page to
    /// post back the URL it landed on.
    pub(super) async fn silent_probe(url: &str, origin: &str, landing_prefix: &str) -> Result<String, ProviderError> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| ProviderError::Environment("no document".to_owned()))?;
        let body = document
            .body()
            .ok_or_else(|| ProviderError::Environment("no body".to_owned()))?;
        let iframe: web_sys::HtmlIFrameElement = document
            .create_element("iframe")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| ProviderError::Environment("iframe element".to_owned()))?;
        iframe.set_attribute("style", "display:none").map_err(js_err)?;
        iframe.set_attribute("title", "silent-check-sso").map_err(js_err)?;

        let (tx, rx) = futures::channel::oneshot::channel::<String>();
        let tx = Rc::new(RefCell::new(Some(tx)));
        let expected_origin = origin.to_owned();
        let prefix = landing_prefix.to_owned();
        let listener = Closure::<dyn FnMut(web_sys::MessageEvent)>::new(move |event: web_sys::MessageEvent| {
            if event.origin() != expected_origin {
                return;
            }
            let Some(landed) = event.data().as_string() else {
                return;
            };
            if !landed.starts_with(&prefix) {
                return;
            }
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(landed);
            }
        });
        window
            .add_event_listener_with_callback("message", listener.as_ref().unchecked_ref())
            .map_err(js_err)?;

        iframe.set_src(url);
        let outcome = match body.append_child(&iframe) {
            Ok(_) => {
                let timeout = gloo_timers::future::TimeoutFuture::new(SILENT_CHECK_TIMEOUT_MS);
                match futures::future::select(rx, Box::pin(timeout)).await {
                    Either::Left((Ok(landed), _)) => Ok(landed),
                    Either::Left((Err(_), _)) => Err(ProviderError::Environment("silent check listener dropped".to_owned())),
                    Either::Right(_) => Err(ProviderError::Timeout),
                }
            }
            Err(e) => Err(js_err(e)),
        };

        let _ = window.remove_event_listener_with_callback("message", listener.as_ref().unchecked_ref());
        iframe.remove();
        outcome
    }
}
