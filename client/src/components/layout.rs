//! Console chrome: sidebar navigation plus the routed page.

use leptos::prelude::*;
use leptos_router::hooks::use_location;
use session::SessionManager;

use crate::routes::{NAV_ITEMS, nav_active};
use crate::state::auth::AuthState;

#[component]
pub fn AppLayout(children: Children) -> impl IntoView {
    view! {
        <div class="layout">
            <Sidebar />
            <main class="layout__main">{children()}</main>
        </div>
    }
}

#[component]
fn Sidebar() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let manager = expect_context::<SessionManager>();
    let location = use_location();

    let on_logout = move |_| manager.logout();

    view! {
        <aside class="sidebar">
            <div class="sidebar__brand">"Featcode"</div>
            <nav class="sidebar__nav">
                {NAV_ITEMS
                    .iter()
                    .map(|&(href, label)| {
                        let class = move || {
                            if nav_active(href, &location.pathname.get()) {
                                "sidebar__link sidebar__link--active"
                            } else {
                                "sidebar__link"
                            }
                        };
                        view! {
                            <a href=href class=class>
                                {label}
                            </a>
                        }
                    })
                    .collect::<Vec<_>>()}
            </nav>
            <Show when=move || auth.get().signed_in()>
                <div class="sidebar__user">
                    <span class="sidebar__avatar">{move || auth.get().initial()}</span>
                    <div class="sidebar__identity">
                        <span class="sidebar__name">{move || auth.get().session.subject_name.unwrap_or_default()}</span>
                        <span class="sidebar__email">{move || auth.get().session.subject_email.unwrap_or_default()}</span>
                    </div>
                    <button class="btn sidebar__logout" on:click=on_logout.clone() title="Sair">
                        "Sair"
                    </button>
                </div>
            </Show>
            <footer class="sidebar__footer">"Gestão de Produtos v0.1"</footer>
        </aside>
    }
}
