use super::*;

#[test]
fn default_points_at_local_realm() {
    let config = ProviderConfig::default();
    assert_eq!(config.url, "http://localhost:8081");
    assert_eq!(config.realm, "featcode");
    assert_eq!(config.client_id, "featcode-frontend");
}

#[test]
fn new_trims_trailing_slashes() {
    let config = ProviderConfig::new("https://sso.example.com//", "shop", "console");
    assert_eq!(config.url, "https://sso.example.com");
    assert_eq!(config.issuer(), "https://sso.example.com/realms/shop");
}

#[test]
fn endpoints_share_openid_connect_prefix() {
    let config = ProviderConfig::new("https://sso.example.com", "shop", "console");
    let prefix = "https://sso.example.com/realms/shop/protocol/openid-connect";
    assert_eq!(config.authorization_endpoint(), format!("{prefix}/auth"));
    assert_eq!(config.token_endpoint(), format!("{prefix}/token"));
    assert_eq!(config.end_session_endpoint(), format!("{prefix}/logout"));
    assert_eq!(config.jwks_endpoint(), format!("{prefix}/certs"));
}
