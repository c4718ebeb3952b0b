//! Small status widgets shared by the pages.

#[cfg(test)]
#[path = "shared_test.rs"]
mod shared_test;

use catalog::StockLevel;
use leptos::prelude::*;

use crate::util::format::format_units;

const DEFAULT_EMPTY_MESSAGE: &str = "Nenhum item encontrado.";
const DEFAULT_ERROR_MESSAGE: &str = "Erro ao carregar dados.";

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <div class="spinner" role="status" aria-label="Carregando">
            <span class="spinner__ring"></span>
        </div>
    }
}

#[component]
pub fn EmptyState(#[prop(optional, into)] message: Option<String>) -> impl IntoView {
    view! { <p class="empty-state">{message.unwrap_or_else(|| DEFAULT_EMPTY_MESSAGE.to_owned())}</p> }
}

#[component]
pub fn ErrorMessage(#[prop(optional, into)] message: Option<String>) -> impl IntoView {
    view! {
        <p class="error-message" role="alert">
            {message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_owned())}
        </p>
    }
}

/// CSS classes for a stock badge.
fn stock_badge_class(stock: i32) -> String {
    format!("badge badge--{}", StockLevel::of(stock).badge_variant())
}

/// Stock quantity colored by level: zero, low, or healthy.
#[component]
pub fn StockBadge(stock: i32) -> impl IntoView {
    view! { <span class=stock_badge_class(stock)>{format_units(stock)}</span> }
}

/// Modal asking the user to confirm a destructive action.
#[component]
pub fn ConfirmDialog(
    #[prop(into)] message: Signal<String>,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="dialog-backdrop" on:click=move |_| on_cancel.run(())>
            <div class="dialog" on:click=move |ev| ev.stop_propagation()>
                <p class="dialog__danger">{move || message.get()}</p>
                <div class="dialog__actions">
                    <button class="btn" on:click=move |_| on_cancel.run(())>
                        "Cancelar"
                    </button>
                    <button class="btn btn--danger" on:click=move |_| on_confirm.run(())>
                        "Excluir"
                    </button>
                </div>
            </div>
        </div>
    }
}
