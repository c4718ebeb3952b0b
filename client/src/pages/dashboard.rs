//! Dashboard page: stock overview with totals, per-category counts and the
//! low-stock alert list.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the landing route. The aggregate is re-fetched on a 30 s poll and
//! whenever a catalog write bumps `CatalogState::dashboard_rev`.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use catalog::{CategorySummary, DashboardData, ProductLowStock};
use leptos::prelude::*;

use crate::components::shared::{EmptyState, ErrorMessage, LoadingSpinner, StockBadge};
use crate::net::api;
use crate::state::catalog::CatalogState;
use crate::util::format::format_brl;

#[cfg(feature = "hydrate")]
const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(30);

const LOW_STOCK_PREVIEW: usize = 6;

/// Title and formatted value of each summary card, in display order.
fn stat_cards(data: &DashboardData) -> [(&'static str, String); 4] {
    [
        ("Total de Produtos", data.total_products.to_string()),
        ("Valor do Estoque", format_brl(data.total_stock_value)),
        ("Estoque Crítico", data.low_stock_count.to_string()),
        ("Categorias", data.total_categories.to_string()),
    ]
}

/// Bar length relative to the largest category, in whole percent.
fn bar_width_percent(count: i64, max: i64) -> i64 {
    if max <= 0 { 0 } else { (count.max(0) * 100) / max }
}

fn low_stock_preview(items: &[ProductLowStock]) -> &[ProductLowStock] {
    &items[..items.len().min(LOW_STOCK_PREVIEW)]
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let catalog = expect_context::<RwSignal<CatalogState>>();
    let poll_tick = RwSignal::new(0_u64);

    let dashboard = LocalResource::new(move || {
        let _ = (catalog.get().dashboard_rev, poll_tick.get());
        api::fetch_dashboard()
    });

    #[cfg(feature = "hydrate")]
    {
        let poll_alive = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
        let poll_alive_task = poll_alive.clone();
        leptos::task::spawn_local(async move {
            loop {
                gloo_timers::future::sleep(POLL_INTERVAL).await;
                if !poll_alive_task.load(std::sync::atomic::Ordering::Relaxed) {
                    break;
                }
                let _ = poll_tick.try_update(|t| *t += 1);
            }
        });
        on_cleanup(move || poll_alive.store(false, std::sync::atomic::Ordering::Relaxed));
    }

    view! {
        <section class="page dashboard">
            <header class="page__header">
                <h1>"Dashboard"</h1>
                <p class="page__subtitle">"Visão geral do sistema de gestão"</p>
            </header>
            <Suspense fallback=|| view! { <LoadingSpinner /> }>
                {move || {
                    dashboard
                        .get()
                        .map(|result| match result {
                            Ok(data) => view! { <DashboardBody data /> }.into_any(),
                            Err(_) => view! { <ErrorMessage message="Erro ao carregar dashboard." /> }.into_any(),
                        })
                }}
            </Suspense>
        </section>
    }
}

#[component]
fn DashboardBody(data: DashboardData) -> impl IntoView {
    let cards = stat_cards(&data)
        .into_iter()
        .map(|(title, value)| {
            view! {
                <div class="stat-card">
                    <span class="stat-card__title">{title}</span>
                    <span class="stat-card__value">{value}</span>
                </div>
            }
        })
        .collect::<Vec<_>>();

    let low_stock = low_stock_preview(&data.low_stock_products).to_vec();

    view! {
        <div class="dashboard__cards">{cards}</div>
        <div class="dashboard__panels">
            <div class="panel">
                <h2 class="panel__title">"Produtos por Categoria"</h2>
                <CategoryBars rows=data.products_by_category />
            </div>
            <div class="panel">
                <h2 class="panel__title">"Estoque Crítico"</h2>
                {if low_stock.is_empty() {
                    view! { <p class="panel__ok">"✓ Todos os produtos com estoque adequado"</p> }.into_any()
                } else {
                    view! {
                        <ul class="low-stock">
                            {low_stock
                                .into_iter()
                                .map(|p| {
                                    view! {
                                        <li class="low-stock__item">
                                            <a href=format!("/products/{}/edit", p.id)>{p.name}</a>
                                            <StockBadge stock=p.stock />
                                        </li>
                                    }
                                })
                                .collect::<Vec<_>>()}
                        </ul>
                    }
                        .into_any()
                }}
            </div>
        </div>
    }
}

#[component]
fn CategoryBars(rows: Vec<CategorySummary>) -> impl IntoView {
    if rows.is_empty() {
        return view! { <EmptyState message="Nenhum produto cadastrado." /> }.into_any();
    }
    let max = rows.iter().map(|r| r.product_count).max().unwrap_or(0);
    view! {
        <ul class="bars">
            {rows
                .into_iter()
                .map(|row| {
                    let width = format!("width: {}%", bar_width_percent(row.product_count, max));
                    view! {
                        <li class="bars__row">
                            <span class="bars__label">{row.category_name}</span>
                            <span class="bars__track">
                                <span class="bars__fill" style=width></span>
                            </span>
                            <span class="bars__count">{row.product_count}</span>
                        </li>
                    }
                })
                .collect::<Vec<_>>()}
        </ul>
    }
        .into_any()
}
