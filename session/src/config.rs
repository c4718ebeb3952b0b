//! Identity-provider coordinates and derived OpenID-Connect endpoints.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_URL: &str = "http://localhost:8081";
pub const DEFAULT_REALM: &str = "featcode";
pub const DEFAULT_CLIENT_ID: &str = "featcode-frontend";

/// Base address, realm and client identifier of a Keycloak-style provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    pub url: String,
    pub realm: String,
    pub client_id: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL, DEFAULT_REALM, DEFAULT_CLIENT_ID)
    }
}

impl ProviderConfig {
    #[must_use]
    pub fn new(url: impl Into<String>, realm: impl Into<String>, client_id: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            url: url.trim_end_matches('/').to_owned(),
            realm: realm.into(),
            client_id: client_id.into(),
        }
    }

    /// Token issuer, e.g. `http://localhost:8081/realms/featcode`.
    #[must_use]
    pub fn issuer(&self) -> String {
        format!("{}/realms/{}", self.url, self.realm)
    }

    #[must_use]
    pub fn authorization_endpoint(&self) -> String {
        self.endpoint("auth")
    }

    #[must_use]
    pub fn token_endpoint(&self) -> String {
        self.endpoint("token")
    }

    #[must_use]
    pub fn end_session_endpoint(&self) -> String {
        self.endpoint("logout")
    }

    /// JSON Web Key Set used by the API server to verify bearer tokens.
    #[must_use]
    pub fn jwks_endpoint(&self) -> String {
        self.endpoint("certs")
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/protocol/openid-connect/{name}", self.issuer())
    }
}
