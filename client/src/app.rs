//! Root application component, SSR shell and route dispatch.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` provides the shared contexts (session manager, reactive auth mirror,
//! catalog invalidation counters) and mounts a single catch-all route. The
//! catch-all resolves the path against `routes::ROUTES` and applies the
//! access gate for entries that require a session, so protection lives in
//! one place instead of being repeated per page.

use std::sync::{Arc, OnceLock};

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::hooks::use_location;
use leptos_router::path;
use session::SessionManager;

use crate::components::layout::AppLayout;
use crate::components::protected_route::ProtectedRoute;
use crate::net::keycloak::BrowserProvider;
use crate::pages::categories::CategoriesPage;
use crate::pages::dashboard::DashboardPage;
use crate::pages::not_found::NotFoundPage;
use crate::pages::product_form::ProductFormPage;
use crate::pages::products::ProductsPage;
use crate::routes::{PageId, RouteMatch};
use crate::state::auth::AuthState;
use crate::state::catalog::CatalogState;
use crate::util::runtime::BrowserRuntime;

/// The tab's session manager, built on first use.
pub fn session_manager() -> &'static SessionManager {
    static MANAGER: OnceLock<SessionManager> = OnceLock::new();
    MANAGER.get_or_init(|| SessionManager::new(Arc::new(BrowserProvider::default()), Arc::new(BrowserRuntime)))
}

/// HTML document rendered by the server around the app.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="pt-BR">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let manager = session_manager().clone();
    let auth = RwSignal::new(AuthState::from(&manager.snapshot()));
    let catalog = RwSignal::new(CatalogState::default());
    provide_context(auth);
    provide_context(catalog);
    provide_context(manager.clone());

    #[cfg(feature = "hydrate")]
    {
        manager.subscribe(move |session| {
            let _ = auth.try_set(AuthState::from(session));
        });
        leptos::task::spawn_local(manager.initialize());
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = manager;
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/inventory.css" />
        <Title text="Featcode" />
        <Router>
            <Routes fallback=|| view! { <NotFoundPage /> }>
                <Route path=path!("") view=RouteDispatch />
                <Route path=path!("/*any") view=RouteDispatch />
            </Routes>
        </Router>
    }
}

/// Resolve the current path and render its page, gated when required.
#[component]
fn RouteDispatch() -> impl IntoView {
    let location = use_location();
    move || match crate::routes::resolve(&location.pathname.get()) {
        Some(matched) if matched.requires_session => view! {
            <ProtectedRoute>
                <AppLayout>{render_page(matched)}</AppLayout>
            </ProtectedRoute>
        }
        .into_any(),
        Some(matched) => view! { <AppLayout>{render_page(matched)}</AppLayout> }.into_any(),
        None => view! { <NotFoundPage /> }.into_any(),
    }
}

fn render_page(matched: RouteMatch) -> AnyView {
    match (matched.page, matched.id) {
        (PageId::Dashboard, _) => view! { <DashboardPage /> }.into_any(),
        (PageId::Products, _) => view! { <ProductsPage /> }.into_any(),
        (PageId::ProductCreate, _) => view! { <ProductFormPage product_id=None /> }.into_any(),
        (PageId::ProductEdit, Some(id)) => view! { <ProductFormPage product_id=Some(id) /> }.into_any(),
        (PageId::ProductEdit, None) => view! { <NotFoundPage /> }.into_any(),
        (PageId::Categories, _) => view! { <CategoriesPage /> }.into_any(),
    }
}
