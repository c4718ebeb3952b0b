//! Category list with a create dialog and delete confirmation.
//!
//! Deleting a category leaves its products in place without a category, so
//! every category write invalidates products and the dashboard as well.

#[cfg(test)]
#[path = "categories_test.rs"]
mod categories_test;

use catalog::{Category, CategoryInput, Field, ValidationError};
use leptos::prelude::*;

use crate::components::shared::{ConfirmDialog, EmptyState, ErrorMessage, LoadingSpinner};
use crate::net::api;
use crate::state::catalog::CatalogState;

fn count_label(count: usize) -> String {
    if count == 1 {
        "1 categoria cadastrada".to_owned()
    } else {
        format!("{count} categorias cadastradas")
    }
}

fn delete_prompt(name: &str) -> String {
    format!("Excluir a categoria \"{name}\"? Os produtos vinculados ficarão sem categoria.")
}

#[component]
pub fn CategoriesPage() -> impl IntoView {
    let catalog = expect_context::<RwSignal<CatalogState>>();
    let show_create = RwSignal::new(false);
    let pending_delete = RwSignal::new(None::<Category>);
    let action_error = RwSignal::new(None::<String>);

    let categories = LocalResource::new(move || {
        let _ = catalog.get().categories_rev;
        api::fetch_categories()
    });

    let on_create_close = Callback::new(move |()| show_create.set(false));
    let on_delete_cancel = Callback::new(move |()| pending_delete.set(None));
    let on_delete_confirm = Callback::new(move |()| {
        let Some(category) = pending_delete.get_untracked() else {
            return;
        };
        pending_delete.set(None);
        leptos::task::spawn_local(async move {
            match api::delete_category(category.id).await {
                Ok(()) => {
                    action_error.set(None);
                    catalog.update(CatalogState::categories_changed);
                }
                Err(_) => action_error.set(Some("Erro ao excluir categoria.".to_owned())),
            }
        });
    });

    view! {
        <section class="page categories">
            <header class="page__header">
                <div>
                    <h1>"Categorias"</h1>
                    <p class="page__subtitle">
                        {move || {
                            categories.get().and_then(Result::ok).map_or_else(|| count_label(0), |list| count_label(list.len()))
                        }}
                    </p>
                </div>
                <button class="btn btn--primary" on:click=move |_| show_create.set(true)>
                    "Nova Categoria"
                </button>
            </header>

            <Show when=move || action_error.get().is_some()>
                <ErrorMessage message=action_error.get().unwrap_or_default() />
            </Show>

            <Suspense fallback=|| view! { <LoadingSpinner /> }>
                {move || {
                    categories
                        .get()
                        .map(|result| match result {
                            Err(_) => view! { <ErrorMessage /> }.into_any(),
                            Ok(list) if list.is_empty() => {
                                view! { <EmptyState message="Nenhuma categoria encontrada. Crie a primeira!" /> }.into_any()
                            }
                            Ok(list) => {
                                view! {
                                    <div class="category-grid">
                                        {list
                                            .into_iter()
                                            .map(|c| {
                                                let target = c.clone();
                                                view! {
                                                    <div class="category-card">
                                                        <div class="category-card__body">
                                                            <h3>{c.name}</h3>
                                                            <p class="category-card__description">
                                                                {c.description.unwrap_or_default()}
                                                            </p>
                                                        </div>
                                                        <button
                                                            class="btn btn--ghost btn--danger"
                                                            title="Excluir"
                                                            on:click=move |_| pending_delete.set(Some(target.clone()))
                                                        >
                                                            "Excluir"
                                                        </button>
                                                    </div>
                                                }
                                            })
                                            .collect::<Vec<_>>()}
                                    </div>
                                }
                                    .into_any()
                            }
                        })
                }}
            </Suspense>

            <Show when=move || show_create.get()>
                <CreateCategoryDialog on_close=on_create_close catalog />
            </Show>
            <Show when=move || pending_delete.get().is_some()>
                <ConfirmDialog
                    message=Signal::derive(move || {
                        pending_delete.get().map(|c| delete_prompt(&c.name)).unwrap_or_default()
                    })
                    on_confirm=on_delete_confirm
                    on_cancel=on_delete_cancel
                />
            </Show>
        </section>
    }
}

/// Modal dialog for creating a category.
#[component]
fn CreateCategoryDialog(on_close: Callback<()>, catalog: RwSignal<CatalogState>) -> impl IntoView {
    let name = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let field_errors = RwSignal::new(None::<ValidationError>);
    let submit_error = RwSignal::new(None::<String>);
    let submitting = RwSignal::new(false);

    let submit = Callback::new(move |()| {
        if submitting.get_untracked() {
            return;
        }
        let input = match CategoryInput::from_form(&name.get_untracked(), &description.get_untracked()) {
            Ok(input) => input,
            Err(errors) => {
                field_errors.set(Some(errors));
                return;
            }
        };
        field_errors.set(None);
        submit_error.set(None);
        submitting.set(true);
        leptos::task::spawn_local(async move {
            let result = api::create_category(&input).await;
            submitting.set(false);
            match result {
                Ok(_) => {
                    catalog.update(CatalogState::categories_changed);
                    on_close.run(());
                }
                Err(_) => submit_error.set(Some("Erro ao criar categoria.".to_owned())),
            }
        });
    });

    let error_for = move |field: Field| move || field_errors.get().and_then(|e| e.message_for(field).map(str::to_owned));

    view! {
        <div class="dialog-backdrop" on:click=move |_| on_close.run(())>
            <div class="dialog" on:click=move |ev| ev.stop_propagation()>
                <h2>"Nova Categoria"</h2>
                <label class="dialog__label">
                    "Nome *"
                    <input
                        class="dialog__input"
                        type="text"
                        placeholder="Ex: Eletrônicos"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                        on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                            if ev.key() == "Enter" {
                                ev.prevent_default();
                                submit.run(());
                            }
                        }
                    />
                    {move || error_for(Field::Name)().map(|m| view! { <p class="form__error">{m}</p> })}
                </label>
                <label class="dialog__label">
                    "Descrição"
                    <textarea
                        class="dialog__input"
                        placeholder="Descrição opcional..."
                        prop:value=move || description.get()
                        on:input=move |ev| description.set(event_target_value(&ev))
                    ></textarea>
                    {move || error_for(Field::Description)().map(|m| view! { <p class="form__error">{m}</p> })}
                </label>
                {move || submit_error.get().map(|m| view! { <ErrorMessage message=m /> })}
                <div class="dialog__actions">
                    <button class="btn" on:click=move |_| on_close.run(())>
                        "Cancelar"
                    </button>
                    <button class="btn btn--primary" disabled=move || submitting.get() on:click=move |_| submit.run(())>
                        {move || if submitting.get() { "Criando..." } else { "Criar" }}
                    </button>
                </div>
            </div>
        </div>
    }
}
