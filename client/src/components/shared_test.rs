use super::*;

#[test]
fn zero_stock_badge_is_destructive() {
    assert_eq!(stock_badge_class(0), "badge badge--destructive");
}

#[test]
fn low_stock_badge_is_warning() {
    assert_eq!(stock_badge_class(10), "badge badge--warning");
    assert_eq!(stock_badge_class(1), "badge badge--warning");
}

#[test]
fn healthy_stock_badge_is_success() {
    assert_eq!(stock_badge_class(11), "badge badge--success");
}
