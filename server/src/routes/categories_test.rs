use super::*;

use crate::services::jwks::Identity;
use crate::state::test_helpers::{seed_category, seed_product, test_app_state};

fn user() -> AuthUser {
    AuthUser { identity: Identity { subject: "ana".into(), email: None, name: None } }
}

fn input(name: &str) -> CategoryInput {
    CategoryInput { name: name.to_owned(), description: None }
}

async fn list(state: &AppState, query: PageQuery) -> Vec<Category> {
    let Json(list) = list_categories(State(state.clone()), user(), ApiQuery(query)).await.unwrap();
    list
}

// =============================================================================
// create / list
// =============================================================================

#[tokio::test]
async fn created_category_is_listed_once() {
    let state = test_app_state();
    let (status, Json(created)) = create_category(State(state.clone()), user(), ApiJson(input("Eletrônicos")))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.description, None);

    let listed = list(&state, PageQuery::default()).await;
    assert_eq!(listed.iter().filter(|c| c.name == "Eletrônicos").count(), 1);
}

#[tokio::test]
async fn name_is_trimmed_and_blank_description_dropped() {
    let state = test_app_state();
    let body = CategoryInput { name: "  Livros ".into(), description: Some("   ".into()) };
    let (_, Json(created)) = create_category(State(state), user(), ApiJson(body)).await.unwrap();
    assert_eq!(created.name, "Livros");
    assert_eq!(created.description, None);
}

#[tokio::test]
async fn duplicate_name_conflicts() {
    let state = test_app_state();
    seed_category(&state, "Eletrônicos").await;
    let err = create_category(State(state.clone()), user(), ApiJson(input("Eletrônicos"))).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
    assert_eq!(err.to_string(), "Categoria com nome 'Eletrônicos' já existe.");
    assert_eq!(list(&state, PageQuery::default()).await.len(), 1);
}

#[tokio::test]
async fn short_name_is_unprocessable_and_not_stored() {
    let state = test_app_state();
    let err = create_category(State(state.clone()), user(), ApiJson(input("a"))).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(list(&state, PageQuery::default()).await.is_empty());
}

#[tokio::test]
async fn listing_honours_skip_and_limit() {
    let state = test_app_state();
    for name in ["Alimentos", "Brinquedos", "Calçados"] {
        seed_category(&state, name).await;
    }
    let page = list(&state, PageQuery { skip: Some(1), limit: Some(1) }).await;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "Brinquedos");
}

// =============================================================================
// get / update / delete
// =============================================================================

#[tokio::test]
async fn malformed_id_is_not_found() {
    let state = test_app_state();
    let err = get_category(State(state), user(), Path("not-a-uuid".into())).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let state = test_app_state();
    let id = uuid::Uuid::new_v4();
    let err = get_category(State(state), user(), Path(id.to_string())).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(err.to_string(), format!("Categoria '{id}' não encontrada."));
}

#[tokio::test]
async fn update_renames_and_rejects_taken_names() {
    let state = test_app_state();
    let moveis = seed_category(&state, "Móveis").await;
    seed_category(&state, "Livros").await;

    let rename = CategoryUpdate { name: Some("Móveis e Decoração".into()), description: None };
    let Json(updated) = update_category(State(state.clone()), user(), Path(moveis.id.to_string()), ApiJson(rename))
        .await
        .unwrap();
    assert_eq!(updated.name, "Móveis e Decoração");

    let clash = CategoryUpdate { name: Some("Livros".into()), description: None };
    let err = update_category(State(state), user(), Path(moveis.id.to_string()), ApiJson(clash)).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn deleting_referenced_category_unassigns_products() {
    let state = test_app_state();
    let cat = seed_category(&state, "Móveis").await;
    let product = seed_product(&state, "Mesa", 3, Some(cat.id)).await;

    let status = delete_category(State(state.clone()), user(), Path(cat.id.to_string())).await.unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(state.store.get_product(product.id).await.unwrap().category_id, None);

    let err = delete_category(State(state), user(), Path(cat.id.to_string())).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}
