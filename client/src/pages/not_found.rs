//! Fallback view for paths outside the route table.

use leptos::prelude::*;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <section class="page not-found">
            <h1>"Página não encontrada"</h1>
            <a class="btn" href="/">
                "Voltar para o Dashboard"
            </a>
        </section>
    }
}
