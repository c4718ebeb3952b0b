use super::*;

use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use futures::future::LocalBoxFuture;
use serde_json::json;
use tokio::task::LocalSet;

const EPOCH: i64 = 1_700_000_000;

fn jwt(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}

fn tokens(exp: i64, refresh: Option<&str>) -> TokenSet {
    let access = jwt(&json!({
        "sub": "u-1",
        "exp": exp,
        "email": "ana@example.com",
        "name": "Ana Souza"
    }));
    TokenSet::new(access, refresh.map(str::to_owned), Some("id-token".to_owned())).unwrap()
}

// =============================================================
// Fakes
// =============================================================

#[derive(Default)]
struct FakeProvider {
    check_result: Mutex<Option<Result<Option<TokenSet>, ProviderError>>>,
    refresh_result: Mutex<Option<Result<TokenSet, ProviderError>>>,
    check_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    login_calls: AtomicUsize,
    logout_hints: Mutex<Vec<Option<String>>>,
}

impl FakeProvider {
    fn with_check(result: Result<Option<TokenSet>, ProviderError>) -> Arc<Self> {
        let provider = Self::default();
        *provider.check_result.lock().unwrap() = Some(result);
        Arc::new(provider)
    }

    fn set_refresh(&self, result: Result<TokenSet, ProviderError>) {
        *self.refresh_result.lock().unwrap() = Some(result);
    }

    fn checks(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    fn refreshes(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    fn logins(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }
}

#[async_trait(?Send)]
impl IdentityProvider for FakeProvider {
    async fn check_sso(&self) -> Result<Option<TokenSet>, ProviderError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.check_result.lock().unwrap().clone().unwrap_or(Ok(None))
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<TokenSet, ProviderError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.refresh_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Err(ProviderError::Rejected("invalid_grant".to_owned())))
    }

    fn login(&self) -> Result<(), ProviderError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn logout(&self, id_token_hint: Option<&str>) -> Result<(), ProviderError> {
        self.logout_hints.lock().unwrap().push(id_token_hint.map(str::to_owned));
        Ok(())
    }
}

struct TokioRuntime {
    start: tokio::time::Instant,
}

impl TokioRuntime {
    fn new() -> Arc<Self> {
        Arc::new(Self { start: tokio::time::Instant::now() })
    }
}

impl Runtime for TokioRuntime {
    fn now(&self) -> i64 {
        EPOCH + i64::try_from(self.start.elapsed().as_secs()).unwrap()
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        tokio::task::spawn_local(task);
    }
}

fn manager(provider: &Arc<FakeProvider>) -> SessionManager {
    SessionManager::new(provider.clone(), TokioRuntime::new())
}

async fn advance(secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs)).await;
}

// =============================================================
// initialize
// =============================================================

#[tokio::test(start_paused = true)]
async fn starts_initializing() {
    let provider = FakeProvider::with_check(Ok(None));
    let manager = manager(&provider);
    assert_eq!(manager.phase(), Phase::Uninitialized);
    let session = manager.snapshot();
    assert!(session.initializing);
    assert!(!session.authenticated);
}

#[tokio::test(start_paused = true)]
async fn concurrent_initialize_makes_one_provider_call() {
    LocalSet::new()
        .run_until(async {
            let provider = FakeProvider::with_check(Ok(Some(tokens(EPOCH + 3_600, Some("r1")))));
            let manager = manager(&provider);

            let first = manager.initialize();
            assert_eq!(manager.phase(), Phase::Initializing);
            let second = manager.initialize();
            let third = manager.clone().initialize();
            futures::join!(first, second, third);

            manager.initialize().await;
            assert_eq!(provider.checks(), 1);
            assert_eq!(manager.phase(), Phase::Settled);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn authenticated_check_exposes_identity() {
    LocalSet::new()
        .run_until(async {
            let provider = FakeProvider::with_check(Ok(Some(tokens(EPOCH + 3_600, Some("r1")))));
            let manager = manager(&provider);
            manager.initialize().await;

            let session = manager.snapshot();
            assert!(session.authenticated);
            assert!(!session.initializing);
            assert_eq!(session.subject_name.as_deref(), Some("Ana Souza"));
            assert_eq!(session.subject_email.as_deref(), Some("ana@example.com"));
            assert!(manager.access_token().is_some());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn provider_failure_settles_unauthenticated() {
    let provider = FakeProvider::with_check(Err(ProviderError::Transport("connection refused".to_owned())));
    let manager = manager(&provider);
    manager.initialize().await;

    let session = manager.snapshot();
    assert!(!session.initializing);
    assert!(!session.authenticated);
    assert!(session.access_token.is_none());
    assert_eq!(provider.logins(), 0);
}

#[tokio::test(start_paused = true)]
async fn not_logged_in_settles_without_refresh_loop() {
    LocalSet::new()
        .run_until(async {
            let provider = FakeProvider::with_check(Ok(None));
            let manager = manager(&provider);
            manager.initialize().await;
            advance(120).await;

            assert!(!manager.snapshot().authenticated);
            assert_eq!(provider.refreshes(), 0);
            assert_eq!(provider.logins(), 0);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn listeners_see_settled_session() {
    let provider = FakeProvider::with_check(Ok(None));
    let manager = manager(&provider);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    manager.subscribe(move |session| sink.lock().unwrap().push(session.clone()));

    manager.initialize().await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(!seen[0].initializing);
    assert!(!seen[0].authenticated);
}

#[tokio::test(start_paused = true)]
async fn expired_access_token_is_never_handed_out() {
    LocalSet::new()
        .run_until(async {
            let provider = FakeProvider::with_check(Ok(Some(tokens(EPOCH - 1, Some("r1")))));
            let manager = manager(&provider);
            manager.initialize().await;

            assert!(manager.access_token().is_none());
            assert!(manager.snapshot().access_token.is_none());
        })
        .await;
}

// =============================================================
// Refresh schedule
// =============================================================

#[tokio::test(start_paused = true)]
async fn fresh_token_is_not_refreshed() {
    LocalSet::new()
        .run_until(async {
            let provider = FakeProvider::with_check(Ok(Some(tokens(EPOCH + 3_600, Some("r1")))));
            let manager = manager(&provider);
            manager.initialize().await;
            advance(95).await;

            assert_eq!(provider.refreshes(), 0);
            assert!(manager.snapshot().authenticated);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn token_near_expiry_is_refreshed_on_tick() {
    LocalSet::new()
        .run_until(async {
            let provider = FakeProvider::with_check(Ok(Some(tokens(EPOCH + 45, Some("r1")))));
            let renewed = TokenSet::new(jwt(&json!({ "exp": EPOCH + 3_600, "name": "Ana Souza" })), None, None).unwrap();
            provider.set_refresh(Ok(renewed.clone()));
            let manager = manager(&provider);
            manager.initialize().await;

            advance(31).await;

            assert_eq!(provider.refreshes(), 1);
            assert_eq!(manager.access_token(), Some(renewed.access_token));
            let held = manager.read_tokens().clone().unwrap();
            assert_eq!(held.refresh_token.as_deref(), Some("r1"));
            assert_eq!(held.id_token.as_deref(), Some("id-token"));
            assert_eq!(provider.logins(), 0);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn failed_refresh_triggers_exactly_one_login() {
    LocalSet::new()
        .run_until(async {
            let provider = FakeProvider::with_check(Ok(Some(tokens(EPOCH + 45, Some("r1")))));
            provider.set_refresh(Err(ProviderError::Rejected("invalid_grant".to_owned())));
            let manager = manager(&provider);
            manager.initialize().await;

            advance(31).await;
            assert_eq!(provider.logins(), 1);
            let session = manager.snapshot();
            assert!(!session.authenticated);
            assert!(session.access_token.is_none());

            advance(300).await;
            assert_eq!(provider.logins(), 1);
            assert_eq!(provider.refreshes(), 1);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn schedule_refresh_is_single_flight() {
    LocalSet::new()
        .run_until(async {
            let provider = FakeProvider::with_check(Ok(Some(tokens(EPOCH + 45, Some("r1")))));
            provider.set_refresh(Err(ProviderError::Timeout));
            let manager = manager(&provider);
            manager.initialize().await;
            manager.schedule_refresh();
            manager.schedule_refresh();

            advance(31).await;
            assert_eq!(provider.refreshes(), 1);
            assert_eq!(provider.logins(), 1);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn update_token_without_session_is_rejected() {
    let provider = FakeProvider::with_check(Ok(None));
    let manager = manager(&provider);
    manager.initialize().await;
    assert_eq!(manager.update_token(60).await, Err(ProviderError::NotAuthenticated));
}

// =============================================================
// logout
// =============================================================

#[tokio::test(start_paused = true)]
async fn logout_clears_tokens_and_stops_refresh() {
    LocalSet::new()
        .run_until(async {
            let provider = FakeProvider::with_check(Ok(Some(tokens(EPOCH + 45, Some("r1")))));
            let manager = manager(&provider);
            manager.initialize().await;

            manager.logout();
            assert!(!manager.snapshot().authenticated);
            assert_eq!(*provider.logout_hints.lock().unwrap(), vec![Some("id-token".to_owned())]);

            advance(120).await;
            assert_eq!(provider.refreshes(), 0);
            assert_eq!(provider.logins(), 0);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn refresh_completing_after_logout_is_discarded() {
    LocalSet::new()
        .run_until(async {
            let provider = FakeProvider::with_check(Ok(Some(tokens(EPOCH + 45, Some("r1")))));
            provider.set_refresh(Ok(tokens(EPOCH + 3_600, Some("r2"))));
            let manager = manager(&provider);
            manager.initialize().await;

            let signed_out = async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                manager.logout();
            };
            let (refreshed, ()) = futures::join!(manager.update_token(60), signed_out);

            assert_eq!(refreshed, Ok(false));
            assert_eq!(provider.refreshes(), 1);
            assert!(manager.read_tokens().is_none());
            let session = manager.snapshot();
            assert!(!session.authenticated);
            assert!(session.access_token.is_none());

            advance(120).await;
            assert!(!manager.snapshot().authenticated);
            assert_eq!(provider.refreshes(), 1);
            assert_eq!(provider.logins(), 0);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn refresh_failing_after_logout_does_not_start_login() {
    LocalSet::new()
        .run_until(async {
            let provider = FakeProvider::with_check(Ok(Some(tokens(EPOCH + 45, Some("r1")))));
            let manager = manager(&provider);
            manager.initialize().await;

            // The loop ticks at 30s and the grant takes 10ms.
            tokio::time::sleep(Duration::from_millis(30_005)).await;
            assert_eq!(provider.refreshes(), 1);
            manager.logout();

            advance(120).await;
            assert!(!manager.snapshot().authenticated);
            assert_eq!(provider.refreshes(), 1);
            assert_eq!(provider.logins(), 0);
        })
        .await;
}
