use super::*;
use serde_json::json;

fn product() -> Product {
    Product {
        id: Uuid::nil(),
        name: "Mouse".to_owned(),
        description: Some("Sem fio".to_owned()),
        price: 89.9,
        stock: 4,
        category_id: Some(Uuid::from_u128(7)),
    }
}

// =============================================================
// Price decoding
// =============================================================

#[test]
fn product_accepts_decimal_string_price() {
    let raw = json!({
        "id": Uuid::nil(),
        "name": "Mouse",
        "price": "10.50",
        "stock": 0,
        "category_id": null
    });
    let product: Product = serde_json::from_value(raw).unwrap();
    assert!((product.price - 10.5).abs() < f64::EPSILON);
    assert!(product.category_id.is_none());
    assert!(product.description.is_none());
}

#[test]
fn product_rejects_non_numeric_price() {
    let raw = json!({ "id": Uuid::nil(), "name": "Mouse", "price": "abc", "stock": 1 });
    assert!(serde_json::from_value::<Product>(raw).is_err());
}

// =============================================================
// Partial updates
// =============================================================

#[test]
fn missing_fields_leave_product_untouched() {
    let update: ProductUpdate = serde_json::from_value(json!({ "stock": 12 })).unwrap();
    let mut target = product();
    update.apply(&mut target);
    assert_eq!(target.stock, 12);
    assert_eq!(target.category_id, Some(Uuid::from_u128(7)));
    assert_eq!(target.description.as_deref(), Some("Sem fio"));
}

#[test]
fn explicit_null_clears_nullable_fields() {
    let update: ProductUpdate =
        serde_json::from_value(json!({ "category_id": null, "description": null })).unwrap();
    assert_eq!(update.category_id, Some(None));
    let mut target = product();
    update.apply(&mut target);
    assert!(target.category_id.is_none());
    assert!(target.description.is_none());
}

#[test]
fn replace_with_serializes_every_field() {
    let update = ProductUpdate::replace_with(ProductInput {
        name: "Teclado".to_owned(),
        description: None,
        price: 150.0,
        stock: 3,
        category_id: None,
    });
    let body = serde_json::to_value(&update).unwrap();
    assert_eq!(body["category_id"], serde_json::Value::Null);
    assert_eq!(body["description"], serde_json::Value::Null);
    assert_eq!(body["name"], "Teclado");
}

#[test]
fn category_update_renames_only() {
    let mut category = Category {
        id: Uuid::nil(),
        name: "Eletrônicos".to_owned(),
        description: Some("Gadgets".to_owned()),
    };
    let update: CategoryUpdate = serde_json::from_value(json!({ "name": "Informática" })).unwrap();
    update.apply(&mut category);
    assert_eq!(category.name, "Informática");
    assert_eq!(category.description.as_deref(), Some("Gadgets"));
}

#[test]
fn category_input_description_is_optional() {
    let input: CategoryInput = serde_json::from_value(json!({ "name": "Eletrônicos" })).unwrap();
    assert!(input.description.is_none());
}
