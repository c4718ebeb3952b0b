use super::*;

use crate::services::jwks::Identity;
use crate::state::test_helpers::{seed_category, seed_product, test_app_state};

fn user() -> AuthUser {
    AuthUser { identity: Identity { subject: "ana".into(), email: None, name: None } }
}

#[tokio::test]
async fn empty_catalog_has_zero_totals() {
    let Json(data) = get_dashboard(State(test_app_state()), user()).await.unwrap();
    assert_eq!(data.total_products, 0);
    assert_eq!(data.total_categories, 0);
    assert!(data.total_stock_value.abs() < f64::EPSILON);
    assert!(data.products_by_category.is_empty());
}

#[tokio::test]
async fn totals_reflect_catalog() {
    let state = test_app_state();
    let cat = seed_category(&state, "Móveis").await;
    seed_product(&state, "Mesa", 4, Some(cat.id)).await;
    seed_product(&state, "Cadeira", 20, None).await;

    let Json(data) = get_dashboard(State(state), user()).await.unwrap();
    assert_eq!(data.total_products, 2);
    assert_eq!(data.total_categories, 1);
    // seed_product prices every item at 10.0
    assert!((data.total_stock_value - 240.0).abs() < 1e-9);
    assert_eq!(data.low_stock_count, 1);
    assert_eq!(data.low_stock_products[0].name, "Mesa");
    assert_eq!(data.products_by_category.len(), 2);
    assert_eq!(data.products_by_category[0].category_id, Some(cat.id));
    assert_eq!(data.products_by_category[1].category_id, None);
}
