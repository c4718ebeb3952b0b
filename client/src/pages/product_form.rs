//! Product create/edit form.
//!
//! SYSTEM CONTEXT
//! ==============
//! Input is parsed and validated with `catalog::ProductForm` before any
//! request is sent, so invalid values never reach the network. A successful
//! save invalidates product and dashboard reads and returns to the list.

#[cfg(test)]
#[path = "product_form_test.rs"]
mod product_form_test;

use catalog::{Field, ProductForm, ProductInput, ProductUpdate, ValidationError};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use uuid::Uuid;

use crate::components::shared::{ErrorMessage, LoadingSpinner};
use crate::net::api;
use crate::state::catalog::CatalogState;

const SAVE_FAILED: &str = "Erro ao salvar produto. Tente novamente.";

/// What a valid form submission sends.
#[derive(Clone, Debug, PartialEq)]
enum SaveRequest {
    Create(ProductInput),
    Update(Uuid, ProductUpdate),
}

impl SaveRequest {
    fn plan(form: &ProductForm, product_id: Option<Uuid>) -> Result<Self, ValidationError> {
        let input = form.parse()?;
        Ok(match product_id {
            Some(id) => Self::Update(id, ProductUpdate::replace_with(input)),
            None => Self::Create(input),
        })
    }

    async fn send(self) -> Result<(), String> {
        match self {
            Self::Create(input) => api::create_product(&input).await.map(|_| ()),
            Self::Update(id, update) => api::update_product(id, &update).await.map(|_| ()),
        }
    }
}

fn page_title(editing: bool) -> &'static str {
    if editing { "Editar Produto" } else { "Novo Produto" }
}

fn submit_label(editing: bool, submitting: bool) -> &'static str {
    match (submitting, editing) {
        (true, _) => "Salvando...",
        (false, true) => "Salvar alterações",
        (false, false) => "Criar produto",
    }
}

#[component]
pub fn ProductFormPage(product_id: Option<Uuid>) -> impl IntoView {
    let catalog = expect_context::<RwSignal<CatalogState>>();
    let navigate = use_navigate();
    let editing = product_id.is_some();

    let form = RwSignal::new(ProductForm::default());
    let field_errors = RwSignal::new(None::<ValidationError>);
    let submit_error = RwSignal::new(None::<String>);
    let submitting = RwSignal::new(false);
    let loaded = RwSignal::new(!editing);
    let saved = RwSignal::new(false);

    let product = LocalResource::new(move || async move {
        match product_id {
            Some(id) => api::fetch_product(id).await.map(Some),
            None => Ok(None),
        }
    });
    let categories = LocalResource::new(move || {
        let _ = catalog.get().categories_rev;
        api::fetch_categories()
    });

    Effect::new(move || {
        if loaded.get_untracked() {
            return;
        }
        if let Some(Ok(Some(p))) = product.get() {
            form.set(ProductForm::from_product(&p));
            loaded.set(true);
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let request = match SaveRequest::plan(&form.get_untracked(), product_id) {
            Ok(request) => request,
            Err(errors) => {
                field_errors.set(Some(errors));
                return;
            }
        };
        field_errors.set(None);
        submit_error.set(None);
        submitting.set(true);
        leptos::task::spawn_local(async move {
            let result = request.send().await;
            submitting.set(false);
            match result {
                Ok(()) => {
                    catalog.update(CatalogState::products_changed);
                    saved.set(true);
                }
                Err(_) => submit_error.set(Some(SAVE_FAILED.to_owned())),
            }
        });
    };

    Effect::new(move || {
        if saved.get() {
            navigate("/products", NavigateOptions::default());
        }
    });

    let error_for = move |field: Field| move || field_errors.get().and_then(|e| e.message_for(field).map(str::to_owned));

    view! {
        <section class="page product-form">
            <a class="back-link" href="/products">
                "← Voltar para Produtos"
            </a>
            <h1>{page_title(editing)}</h1>

            <Show
                when=move || loaded.get() || matches!(product.get(), Some(Err(_)))
                fallback=|| view! { <LoadingSpinner /> }
            >
                <Show when=move || matches!(product.get(), Some(Err(_)))>
                    <ErrorMessage />
                </Show>
                <form class="form" on:submit=on_submit>
                    <label class="form__field">
                        "Nome *"
                        <input
                            class="input"
                            placeholder="Ex: Notebook Dell XPS"
                            prop:value=move || form.get().name
                            on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                        />
                        <FieldMessage message=Signal::derive(error_for(Field::Name)) />
                    </label>
                    <label class="form__field">
                        "Descrição"
                        <textarea
                            class="input"
                            placeholder="Descrição opcional do produto..."
                            prop:value=move || form.get().description
                            on:input=move |ev| form.update(|f| f.description = event_target_value(&ev))
                        ></textarea>
                        <FieldMessage message=Signal::derive(error_for(Field::Description)) />
                    </label>
                    <div class="form__row">
                        <label class="form__field">
                            "Preço (R$) *"
                            <input
                                class="input"
                                type="number"
                                step="0.01"
                                min="0.01"
                                placeholder="0,00"
                                prop:value=move || form.get().price
                                on:input=move |ev| form.update(|f| f.price = event_target_value(&ev))
                            />
                            <FieldMessage message=Signal::derive(error_for(Field::Price)) />
                        </label>
                        <label class="form__field">
                            "Estoque *"
                            <input
                                class="input"
                                type="number"
                                min="0"
                                placeholder="0"
                                prop:value=move || form.get().stock
                                on:input=move |ev| form.update(|f| f.stock = event_target_value(&ev))
                            />
                            <FieldMessage message=Signal::derive(error_for(Field::Stock)) />
                        </label>
                    </div>
                    <label class="form__field">
                        "Categoria"
                        <select
                            class="input"
                            prop:value=move || form.get().category_id
                            on:change=move |ev| form.update(|f| f.category_id = event_target_value(&ev))
                        >
                            <option value="">"Sem categoria"</option>
                            {move || {
                                categories
                                    .get()
                                    .and_then(Result::ok)
                                    .unwrap_or_default()
                                    .into_iter()
                                    .map(|c| view! { <option value=c.id.to_string()>{c.name}</option> })
                                    .collect::<Vec<_>>()
                            }}
                        </select>
                        <FieldMessage message=Signal::derive(error_for(Field::CategoryId)) />
                    </label>

                    <Show when=move || submit_error.get().is_some()>
                        <ErrorMessage message=submit_error.get().unwrap_or_default() />
                    </Show>

                    <div class="form__actions">
                        <button class="btn btn--primary" type="submit" disabled=move || submitting.get()>
                            {move || submit_label(editing, submitting.get())}
                        </button>
                        <a class="btn" href="/products">
                            "Cancelar"
                        </a>
                    </div>
                </form>
            </Show>
        </section>
    }
}

#[component]
fn FieldMessage(message: Signal<Option<String>>) -> impl IntoView {
    move || message.get().map(|m| view! { <p class="form__error">{m}</p> })
}
