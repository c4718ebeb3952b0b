use super::*;

fn form(price: &str, stock: &str) -> ProductForm {
    ProductForm {
        name: "Cadeira gamer".to_owned(),
        description: String::new(),
        price: price.to_owned(),
        stock: stock.to_owned(),
        category_id: String::new(),
    }
}

// =============================================================
// Validation before save
// =============================================================

#[test]
fn negative_price_is_rejected_before_any_request() {
    let err = SaveRequest::plan(&form("-5", "3"), None).unwrap_err();
    assert_eq!(err.message_for(Field::Price), Some("Preço deve ser maior que 0"));
}

#[test]
fn zero_stock_product_is_accepted() {
    let Ok(SaveRequest::Create(input)) = SaveRequest::plan(&form("10.50", "0"), None) else {
        panic!("expected a create request");
    };
    assert!((input.price - 10.5).abs() < f64::EPSILON);
    assert_eq!(input.stock, 0);
    assert_eq!(catalog::StockLevel::of(input.stock), catalog::StockLevel::Out);
}

#[test]
fn comma_decimal_is_accepted() {
    assert!(matches!(SaveRequest::plan(&form("10,50", "1"), None), Ok(SaveRequest::Create(_))));
}

#[test]
fn editing_sends_full_replacement() {
    let id = Uuid::new_v4();
    let Ok(SaveRequest::Update(target, update)) = SaveRequest::plan(&form("3", "2"), Some(id)) else {
        panic!("expected an update request");
    };
    assert_eq!(target, id);
    assert_eq!(update.stock, Some(2));
    assert_eq!(update.category_id, Some(None));
}

// =============================================================
// Labels
// =============================================================

#[test]
fn titles_follow_mode() {
    assert_eq!(page_title(true), "Editar Produto");
    assert_eq!(page_title(false), "Novo Produto");
}

#[test]
fn submit_label_tracks_progress() {
    assert_eq!(submit_label(false, false), "Criar produto");
    assert_eq!(submit_label(true, false), "Salvar alterações");
    assert_eq!(submit_label(true, true), "Salvando...");
}
