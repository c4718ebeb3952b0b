//! Route table and dispatch gate.
//!
//! DESIGN
//! ======
//! Every screen is one row: a path pattern, the page it renders, and whether
//! it needs an authenticated session. The router hands every path to
//! [`resolve`]; `app::Dispatch` then applies the session gate once for all
//! protected rows instead of nesting guards per page.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageId {
    Dashboard,
    Products,
    ProductCreate,
    ProductEdit,
    Categories,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Segment {
    Literal(&'static str),
    /// A UUID path parameter.
    Id,
}

#[derive(Clone, Copy, Debug)]
pub struct RouteEntry {
    pub pattern: &'static str,
    pub page: PageId,
    pub requires_session: bool,
    segments: &'static [Segment],
}

pub const ROUTES: &[RouteEntry] = &[
    RouteEntry { pattern: "/", page: PageId::Dashboard, requires_session: true, segments: &[] },
    RouteEntry {
        pattern: "/products",
        page: PageId::Products,
        requires_session: true,
        segments: &[Segment::Literal("products")],
    },
    RouteEntry {
        pattern: "/products/new",
        page: PageId::ProductCreate,
        requires_session: true,
        segments: &[Segment::Literal("products"), Segment::Literal("new")],
    },
    RouteEntry {
        pattern: "/products/:id/edit",
        page: PageId::ProductEdit,
        requires_session: true,
        segments: &[Segment::Literal("products"), Segment::Id, Segment::Literal("edit")],
    },
    RouteEntry {
        pattern: "/categories",
        page: PageId::Categories,
        requires_session: true,
        segments: &[Segment::Literal("categories")],
    },
];

/// A matched route with its path parameter, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteMatch {
    pub page: PageId,
    pub requires_session: bool,
    pub id: Option<Uuid>,
}

/// Match `path` against [`ROUTES`]. Query strings, fragments and a trailing
/// slash are ignored. Returns `None` for unknown paths.
#[must_use]
pub fn resolve(path: &str) -> Option<RouteMatch> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    ROUTES.iter().find_map(|entry| {
        if entry.segments.len() != parts.len() {
            return None;
        }
        let mut id = None;
        for (segment, part) in entry.segments.iter().zip(&parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Id => id = Some(Uuid::parse_str(part).ok()?),
            }
        }
        Some(RouteMatch { page: entry.page, requires_session: entry.requires_session, id })
    })
}

/// Sidebar navigation entries: path and label.
pub const NAV_ITEMS: &[(&str, &str)] = &[("/", "Dashboard"), ("/products", "Produtos"), ("/categories", "Categorias")];

/// Whether the sidebar entry for `target` is active at `path`. The root entry
/// only matches exactly.
#[must_use]
pub fn nav_active(target: &str, path: &str) -> bool {
    if target == "/" {
        return path == "/" || path.is_empty();
    }
    path == target || path.starts_with(&format!("{target}/"))
}
