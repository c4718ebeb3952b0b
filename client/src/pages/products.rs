//! Product list with name search, category filter and delete.
//!
//! SYSTEM CONTEXT
//! ==============
//! The search box is debounced before it reaches the query; the server does
//! the case-insensitive match. Deletes bump `CatalogState` so the list and the
//! dashboard re-fetch.

#[cfg(test)]
#[path = "products_test.rs"]
mod products_test;

use catalog::{Category, Product};
use leptos::prelude::*;
use uuid::Uuid;

use crate::components::shared::{ConfirmDialog, EmptyState, ErrorMessage, LoadingSpinner, StockBadge};
use crate::net::api::{self, ProductQuery};
use crate::state::catalog::CatalogState;
use crate::util::format::format_brl;

#[cfg(feature = "hydrate")]
const SEARCH_DEBOUNCE: std::time::Duration = std::time::Duration::from_millis(400);

const NO_CATEGORY: &str = "—";

fn results_label(count: usize) -> String {
    if count == 1 {
        "1 produto encontrado".to_owned()
    } else {
        format!("{count} produtos encontrados")
    }
}

fn category_label(category_id: Option<Uuid>, categories: &[Category]) -> String {
    category_id
        .and_then(|id| categories.iter().find(|c| c.id == id))
        .map_or_else(|| NO_CATEGORY.to_owned(), |c| c.name.clone())
}

fn delete_prompt(name: &str) -> String {
    format!("Excluir \"{name}\"?")
}

/// Category `<select>` value to filter; empty or garbage means "all".
fn parse_category_filter(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

#[component]
pub fn ProductsPage() -> impl IntoView {
    let catalog = expect_context::<RwSignal<CatalogState>>();

    let search_input = RwSignal::new(String::new());
    let search = RwSignal::new(String::new());
    let search_generation = RwSignal::new(0_u64);
    let category_filter = RwSignal::new(None::<Uuid>);
    let pending_delete = RwSignal::new(None::<Product>);
    let action_error = RwSignal::new(None::<String>);

    let products = LocalResource::new(move || {
        let _ = catalog.get().products_rev;
        let query = ProductQuery {
            search: Some(search.get()),
            category_id: category_filter.get(),
            ..ProductQuery::default()
        };
        async move { api::fetch_products(&query).await }
    });
    let categories = LocalResource::new(move || {
        let _ = catalog.get().categories_rev;
        api::fetch_categories()
    });
    let category_list = move || categories.get().and_then(Result::ok).unwrap_or_default();

    let on_search = move |ev| {
        let value = event_target_value(&ev);
        search_input.set(value.clone());
        let ticket = search_generation.get_untracked() + 1;
        search_generation.set(ticket);
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            gloo_timers::future::sleep(SEARCH_DEBOUNCE).await;
            if search_generation.try_get_untracked() == Some(ticket) {
                let _ = search.try_set(value);
            }
        });
        #[cfg(not(feature = "hydrate"))]
        search.set(value);
    };

    let on_delete_cancel = Callback::new(move |()| pending_delete.set(None));
    let on_delete_confirm = Callback::new(move |()| {
        let Some(product) = pending_delete.get_untracked() else {
            return;
        };
        pending_delete.set(None);
        leptos::task::spawn_local(async move {
            match api::delete_product(product.id).await {
                Ok(()) => {
                    action_error.set(None);
                    catalog.update(CatalogState::products_changed);
                }
                Err(_) => action_error.set(Some("Erro ao excluir produto.".to_owned())),
            }
        });
    });

    view! {
        <section class="page products">
            <header class="page__header">
                <div>
                    <h1>"Produtos"</h1>
                    <p class="page__subtitle">
                        {move || {
                            products
                                .get()
                                .and_then(Result::ok)
                                .map_or_else(|| results_label(0), |list| results_label(list.len()))
                        }}
                    </p>
                </div>
                <a class="btn btn--primary" href="/products/new">
                    "Novo Produto"
                </a>
            </header>

            <div class="filters">
                <input
                    class="input filters__search"
                    type="search"
                    placeholder="Buscar por nome..."
                    prop:value=move || search_input.get()
                    on:input=on_search
                />
                <select
                    class="input filters__category"
                    on:change=move |ev| category_filter.set(parse_category_filter(&event_target_value(&ev)))
                >
                    <option value="">"Todas as categorias"</option>
                    {move || {
                        category_list()
                            .into_iter()
                            .map(|c| view! { <option value=c.id.to_string()>{c.name}</option> })
                            .collect::<Vec<_>>()
                    }}
                </select>
            </div>

            <Show when=move || action_error.get().is_some()>
                <ErrorMessage message=action_error.get().unwrap_or_default() />
            </Show>

            <Suspense fallback=|| view! { <LoadingSpinner /> }>
                {move || {
                    products
                        .get()
                        .map(|result| match result {
                            Err(_) => view! { <ErrorMessage /> }.into_any(),
                            Ok(list) if list.is_empty() => {
                                view! { <EmptyState message="Nenhum produto encontrado. Crie o primeiro!" /> }.into_any()
                            }
                            Ok(list) => {
                                let cats = category_list();
                                view! {
                                    <table class="table">
                                        <thead>
                                            <tr>
                                                <th>"Produto"</th>
                                                <th>"Categoria"</th>
                                                <th class="table__num">"Preço"</th>
                                                <th class="table__center">"Estoque"</th>
                                                <th></th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {list
                                                .into_iter()
                                                .map(|p| {
                                                    let category = category_label(p.category_id, &cats);
                                                    let edit_href = format!("/products/{}/edit", p.id);
                                                    let target = p.clone();
                                                    view! {
                                                        <tr>
                                                            <td>
                                                                <p class="table__primary">{p.name}</p>
                                                                <p class="table__secondary">{p.description.unwrap_or_default()}</p>
                                                            </td>
                                                            <td>{category}</td>
                                                            <td class="table__num">{format_brl(p.price)}</td>
                                                            <td class="table__center">
                                                                <StockBadge stock=p.stock />
                                                            </td>
                                                            <td class="table__actions">
                                                                <a class="btn btn--ghost" href=edit_href>
                                                                    "Editar"
                                                                </a>
                                                                <button
                                                                    class="btn btn--ghost btn--danger"
                                                                    on:click=move |_| pending_delete.set(Some(target.clone()))
                                                                >
                                                                    "Excluir"
                                                                </button>
                                                            </td>
                                                        </tr>
                                                    }
                                                })
                                                .collect::<Vec<_>>()}
                                        </tbody>
                                    </table>
                                }
                                    .into_any()
                            }
                        })
                }}
            </Suspense>

            <Show when=move || pending_delete.get().is_some()>
                <ConfirmDialog
                    message=Signal::derive(move || {
                        pending_delete.get().map(|p| delete_prompt(&p.name)).unwrap_or_default()
                    })
                    on_confirm=on_delete_confirm
                    on_cancel=on_delete_cancel
                />
            </Show>
        </section>
    }
}
