use super::*;

#[test]
fn root_is_dashboard() {
    let m = resolve("/").unwrap();
    assert_eq!(m.page, PageId::Dashboard);
    assert!(m.requires_session);
    assert!(m.id.is_none());
}

#[test]
fn literal_routes_resolve() {
    assert_eq!(resolve("/products").unwrap().page, PageId::Products);
    assert_eq!(resolve("/products/new").unwrap().page, PageId::ProductCreate);
    assert_eq!(resolve("/categories").unwrap().page, PageId::Categories);
}

#[test]
fn trailing_slash_and_query_are_ignored() {
    assert_eq!(resolve("/products/?search=mouse").unwrap().page, PageId::Products);
    assert_eq!(resolve("/categories#top").unwrap().page, PageId::Categories);
}

#[test]
fn edit_route_captures_id() {
    let id = Uuid::from_u128(42);
    let m = resolve(&format!("/products/{id}/edit")).unwrap();
    assert_eq!(m.page, PageId::ProductEdit);
    assert_eq!(m.id, Some(id));
}

#[test]
fn edit_route_rejects_non_uuid() {
    assert!(resolve("/products/abc/edit").is_none());
}

#[test]
fn unknown_paths_do_not_resolve() {
    assert!(resolve("/users").is_none());
    assert!(resolve("/products/new/extra").is_none());
}

#[test]
fn every_console_route_requires_a_session() {
    assert!(ROUTES.iter().all(|r| r.requires_session));
}

#[test]
fn nav_root_matches_exactly() {
    assert!(nav_active("/", "/"));
    assert!(!nav_active("/", "/products"));
}

#[test]
fn nav_section_matches_children() {
    assert!(nav_active("/products", "/products/new"));
    assert!(!nav_active("/products", "/productsx"));
}
