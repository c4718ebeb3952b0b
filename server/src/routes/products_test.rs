use super::*;

use crate::services::jwks::Identity;
use crate::state::test_helpers::{seed_category, seed_product, test_app_state};

fn user() -> AuthUser {
    AuthUser { identity: Identity { subject: "ana".into(), email: None, name: None } }
}

fn input(name: &str, price: f64, stock: i32) -> ProductInput {
    ProductInput { name: name.to_owned(), description: None, price, stock, category_id: None }
}

async fn list(state: &AppState, query: ProductQuery) -> Vec<Product> {
    let Json(list) = list_products(State(state.clone()), user(), ApiQuery(query)).await.unwrap();
    list
}

// =============================================================================
// create
// =============================================================================

#[tokio::test]
async fn zero_stock_product_is_accepted() {
    let state = test_app_state();
    let (status, Json(created)) = create_product(State(state), user(), ApiJson(input("Cadeira", 10.50, 0)))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.stock, 0);
    assert!((created.price - 10.50).abs() < f64::EPSILON);
}

#[tokio::test]
async fn negative_price_is_unprocessable() {
    let state = test_app_state();
    let err = create_product(State(state.clone()), user(), ApiJson(input("Cadeira", -5.0, 1))).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(list(&state, ProductQuery::default()).await.is_empty());
}

#[tokio::test]
async fn unknown_category_is_unprocessable() {
    let state = test_app_state();
    let body = ProductInput { category_id: Some(Uuid::new_v4()), ..input("Cadeira", 1.0, 1) };
    let err = create_product(State(state), user(), ApiJson(body)).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// list / low stock
// =============================================================================

#[tokio::test]
async fn search_and_category_filters_combine() {
    let state = test_app_state();
    let audio = seed_category(&state, "Áudio").await;
    seed_product(&state, "Fone Bluetooth", 5, Some(audio.id)).await;
    seed_product(&state, "Fone com fio", 5, None).await;
    seed_product(&state, "Caixa de som", 5, Some(audio.id)).await;

    let found = list(
        &state,
        ProductQuery { search: Some(" fone ".into()), category_id: Some(audio.id), ..ProductQuery::default() },
    )
    .await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Fone Bluetooth");
}

#[tokio::test]
async fn blank_search_lists_everything() {
    let state = test_app_state();
    seed_product(&state, "Mesa", 5, None).await;
    seed_product(&state, "Cadeira", 5, None).await;
    let found = list(&state, ProductQuery { search: Some("  ".into()), ..ProductQuery::default() }).await;
    assert_eq!(found.len(), 2);
}

#[tokio::test]
async fn low_stock_lists_threshold_and_below() {
    let state = test_app_state();
    seed_product(&state, "Mesa", 11, None).await;
    seed_product(&state, "Cadeira", 10, None).await;
    seed_product(&state, "Banco", 0, None).await;

    let Json(low) = list_low_stock(State(state), user()).await.unwrap();
    let names: Vec<_> = low.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Banco", "Cadeira"]);
}

// =============================================================================
// get / update / stock / delete
// =============================================================================

#[tokio::test]
async fn malformed_id_is_not_found() {
    let state = test_app_state();
    let err = get_product(State(state), user(), Path("123".into())).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(err.to_string(), "Produto '123' não encontrado.");
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let state = test_app_state();
    let product = seed_product(&state, "Mesa", 5, None).await;
    let patch = ProductUpdate { price: Some(99.9), ..ProductUpdate::default() };
    let Json(updated) = update_product(State(state), user(), Path(product.id.to_string()), ApiJson(patch))
        .await
        .unwrap();
    assert!((updated.price - 99.9).abs() < f64::EPSILON);
    assert_eq!(updated.name, "Mesa");
    assert_eq!(updated.stock, 5);
}

#[tokio::test]
async fn update_of_missing_product_with_unknown_category_is_not_found() {
    let state = test_app_state();
    let patch = ProductUpdate { category_id: Some(Some(Uuid::new_v4())), ..ProductUpdate::default() };
    let err = update_product(State(state), user(), Path(Uuid::new_v4().to_string()), ApiJson(patch))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_invalid_price_is_unprocessable() {
    let state = test_app_state();
    let product = seed_product(&state, "Mesa", 5, None).await;
    let patch = ProductUpdate { price: Some(0.0), ..ProductUpdate::default() };
    let err = update_product(State(state), user(), Path(product.id.to_string()), ApiJson(patch)).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn stock_update_rejects_negative_values() {
    let state = test_app_state();
    let product = seed_product(&state, "Mesa", 5, None).await;

    let Json(updated) =
        update_stock(State(state.clone()), user(), Path(product.id.to_string()), ApiJson(StockUpdate { stock: 0 }))
            .await
            .unwrap();
    assert_eq!(updated.stock, 0);

    let err = update_stock(State(state), user(), Path(product.id.to_string()), ApiJson(StockUpdate { stock: -1 }))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let state = test_app_state();
    let product = seed_product(&state, "Mesa", 5, None).await;
    let status = delete_product(State(state.clone()), user(), Path(product.id.to_string())).await.unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);
    let err = get_product(State(state), user(), Path(product.id.to_string())).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}
