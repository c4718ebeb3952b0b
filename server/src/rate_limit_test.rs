use super::*;

fn small() -> RateLimiter {
    RateLimiter::new(RateLimitConfig {
        read_limit: 3,
        write_limit: 2,
        low_stock_limit: 1,
        user_admin_limit: 1,
        window: Duration::from_secs(60),
    })
}

#[test]
fn defaults_match_published_limits() {
    let cfg = RateLimitConfig::default();
    assert_eq!(cfg.limit(RateClass::Read), 100);
    assert_eq!(cfg.limit(RateClass::Write), 30);
    assert_eq!(cfg.limit(RateClass::LowStock), 60);
    assert_eq!(cfg.limit(RateClass::UserAdmin), 20);
    assert_eq!(cfg.window, Duration::from_secs(60));
}

#[test]
fn allows_up_to_limit_then_rejects() {
    let rl = small();
    let now = Instant::now();

    for i in 0..3 {
        assert!(rl.check_and_record_at("ana", RateClass::Read, now).is_ok(), "request {i} should succeed");
    }
    assert_eq!(
        rl.check_and_record_at("ana", RateClass::Read, now),
        Err(RateLimitError::Exceeded { class: RateClass::Read, limit: 3, window_secs: 60 })
    );
}

#[test]
fn classes_have_independent_budgets() {
    let rl = small();
    let now = Instant::now();

    rl.check_and_record_at("ana", RateClass::Write, now).unwrap();
    rl.check_and_record_at("ana", RateClass::Write, now).unwrap();
    assert!(rl.check_and_record_at("ana", RateClass::Write, now).is_err());

    // Reads and the low-stock listing are unaffected.
    assert!(rl.check_and_record_at("ana", RateClass::Read, now).is_ok());
    assert!(rl.check_and_record_at("ana", RateClass::LowStock, now).is_ok());
    assert!(rl.check_and_record_at("ana", RateClass::LowStock, now).is_err());
}

#[test]
fn window_expiry_allows_new_requests() {
    let rl = small();
    let start = Instant::now();

    for _ in 0..2 {
        rl.check_and_record_at("ana", RateClass::Write, start).unwrap();
    }
    assert!(rl.check_and_record_at("ana", RateClass::Write, start).is_err());

    let after_window = start + Duration::from_secs(60) + Duration::from_millis(1);
    assert!(rl.check_and_record_at("ana", RateClass::Write, after_window).is_ok());
}

#[test]
fn window_slides_per_request() {
    let rl = small();
    let start = Instant::now();

    rl.check_and_record_at("ana", RateClass::Write, start).unwrap();
    rl.check_and_record_at("ana", RateClass::Write, start + Duration::from_secs(30)).unwrap();

    // Only the first request has left the window.
    let t = start + Duration::from_secs(61);
    assert!(rl.check_and_record_at("ana", RateClass::Write, t).is_ok());
    assert!(rl.check_and_record_at("ana", RateClass::Write, t).is_err());
}

#[test]
fn rejected_requests_are_not_recorded() {
    let rl = small();
    let start = Instant::now();

    rl.check_and_record_at("ana", RateClass::LowStock, start).unwrap();
    for _ in 0..5 {
        assert!(rl.check_and_record_at("ana", RateClass::LowStock, start + Duration::from_secs(30)).is_err());
    }
    assert!(rl.check_and_record_at("ana", RateClass::LowStock, start + Duration::from_secs(61)).is_ok());
}

#[test]
fn distinct_subjects_do_not_interfere() {
    let rl = small();
    let now = Instant::now();

    for _ in 0..3 {
        rl.check_and_record_at("ana", RateClass::Read, now).unwrap();
    }
    assert!(rl.check_and_record_at("ana", RateClass::Read, now).is_err());
    assert!(rl.check_and_record_at("bruno", RateClass::Read, now).is_ok());
}

#[test]
fn clones_share_counters() {
    let rl = small();
    let clone = rl.clone();
    let now = Instant::now();

    rl.check_and_record_at("ana", RateClass::LowStock, now).unwrap();
    assert!(clone.check_and_record_at("ana", RateClass::LowStock, now).is_err());
}

#[test]
fn error_message_names_limit_and_window() {
    let err = RateLimitError::Exceeded { class: RateClass::Write, limit: 30, window_secs: 60 };
    assert_eq!(err.to_string(), "rate limit exceeded (max 30 requests/60s)");
}

#[test]
fn idle_subjects_are_evicted_after_window() {
    let rl = small();
    let start = Instant::now();

    for i in 0..50 {
        rl.check_and_record_at(&format!("user-{i}"), RateClass::Read, start).unwrap();
    }
    assert_eq!(rl.tracked_buckets(), 50);

    let later = start + Duration::from_secs(61);
    rl.check_and_record_at("ana", RateClass::Read, later).unwrap();
    assert_eq!(rl.tracked_buckets(), 1);
}

#[test]
fn zero_budget_rejection_leaves_no_bucket() {
    let rl = RateLimiter::new(RateLimitConfig { write_limit: 0, ..RateLimitConfig::default() });
    let now = Instant::now();

    assert!(rl.check_and_record_at("ana", RateClass::Write, now).is_err());
    assert_eq!(rl.tracked_buckets(), 0);
}
