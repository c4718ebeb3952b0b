//! Per-view access gate.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps every route whose table entry requires a session. Each mount owns a
//! fresh `AccessGate`, so a logged-out visitor triggers exactly one login
//! redirect per view no matter how often the auth signal changes.

use std::sync::Arc;

use leptos::prelude::*;
use session::{AccessGate, SessionManager};

use crate::components::shared::LoadingSpinner;
use crate::state::auth::AuthState;

/// Render `children` only for an authenticated session; otherwise show the
/// waiting indicator and request login once.
#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let manager = expect_context::<SessionManager>();
    let gate = Arc::new(AccessGate::new());

    Effect::new(move || {
        let state = auth.get();
        gate.guard(&state.session, &manager);
    });

    view! {
        <Show when=move || auth.get().signed_in() fallback=|| view! { <LoadingSpinner /> }>
            {children()}
        </Show>
    }
}
