use super::*;

fn category(n: u128, name: &str) -> Category {
    Category { id: Uuid::from_u128(n), name: name.to_owned(), description: None }
}

fn product(n: u128, name: &str, price: f64, stock: i32, category_id: Option<u128>) -> Product {
    Product {
        id: Uuid::from_u128(n),
        name: name.to_owned(),
        description: None,
        price,
        stock,
        category_id: category_id.map(Uuid::from_u128),
    }
}

#[test]
fn empty_catalog_is_all_zero() {
    let data = DashboardData::summarize(&[], &[]);
    assert_eq!(data, DashboardData::default());
}

#[test]
fn totals_and_stock_value() {
    let categories = [category(1, "Eletrônicos"), category(2, "Livros")];
    let products = [
        product(10, "Notebook", 3_500.0, 2, Some(1)),
        product(11, "Mouse", 50.25, 4, Some(1)),
        product(12, "Romance", 40.0, 20, None),
    ];
    let data = DashboardData::summarize(&categories, &products);
    assert_eq!(data.total_products, 3);
    assert_eq!(data.total_categories, 2);
    assert!((data.total_stock_value - 8_001.0).abs() < 1e-9);
}

#[test]
fn low_stock_sorted_by_stock_then_name() {
    let products = [
        product(1, "Zeta", 1.0, 5, None),
        product(2, "Alfa", 1.0, 5, None),
        product(3, "Beta", 1.0, 0, None),
        product(4, "Gama", 1.0, 11, None),
    ];
    let data = DashboardData::summarize(&[], &products);
    let names: Vec<&str> = data.low_stock_products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Beta", "Alfa", "Zeta"]);
    assert_eq!(data.low_stock_count, 3);
}

#[test]
fn uncategorised_row_is_last_and_empty_categories_are_skipped() {
    let categories = [category(1, "Livros"), category(2, "Eletrônicos"), category(3, "Vazia")];
    let products = [
        product(10, "A", 1.0, 50, Some(1)),
        product(11, "B", 1.0, 50, Some(2)),
        product(12, "C", 1.0, 50, Some(2)),
        product(13, "D", 1.0, 50, None),
    ];
    let data = DashboardData::summarize(&categories, &products);
    let rows: Vec<(&str, i64)> = data
        .products_by_category
        .iter()
        .map(|r| (r.category_name.as_str(), r.product_count))
        .collect();
    assert_eq!(rows, [("Eletrônicos", 2), ("Livros", 1), (UNCATEGORIZED_LABEL, 1)]);
    assert!(data.products_by_category[2].category_id.is_none());
}
