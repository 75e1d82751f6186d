//! Category Tree Component
//!
//! Left sidebar: categories with collapsible subcategories, inline add and
//! delete. Renders the display tree, so pending deletions are already hidden.

use std::collections::HashSet;

use leptos::prelude::*;
use prompt_sync::tree::{visible_rows, TreeRow};

use crate::components::{DeleteConfirmButton, NameForm};
use crate::context::use_app_context;
use crate::store::{use_app_store, ConsoleStateStoreFields};

#[component]
pub fn CategoryTree() -> impl IntoView {
    let store = use_app_store();
    let (expanded, set_expanded) = signal(HashSet::<String>::new());
    let (adding_under, set_adding_under) = signal::<Option<String>>(None);

    let rows = move || {
        let tree = store.tree().read();
        visible_rows(&tree.display(), &expanded.get())
    };
    let is_empty = move || {
        let tree = store.tree().read();
        !tree.loading && tree.categories.is_empty()
    };

    view! {
        <aside class="category-sidebar">
            <Show when=move || store.tree().read().loading>
                <p class="sidebar-status">"Loading..."</p>
            </Show>
            <Show when=is_empty>
                <p class="sidebar-status">"No categories yet"</p>
            </Show>
            <div class="category-tree">
                <For
                    each=rows
                    // Debug text covers every displayed field, so any change re-renders the row
                    key=|row| format!("{:?}", row)
                    children=move |row| match row {
                        TreeRow::Category { id, name, expanded: is_expanded, subcategory_count } => view! {
                            <CategoryRow
                                id=id
                                name=name
                                expanded=is_expanded
                                subcategory_count=subcategory_count
                                set_expanded=set_expanded
                                adding_under=adding_under
                                set_adding_under=set_adding_under
                            />
                        }
                        .into_any(),
                        TreeRow::Subcategory { category_id, id, name, prompt_count } => view! {
                            <SubcategoryRow
                                category_id=category_id
                                id=id
                                name=name
                                prompt_count=prompt_count
                            />
                        }
                        .into_any(),
                    }
                />
            </div>
        </aside>
    }
}

#[component]
fn CategoryRow(
    id: String,
    name: String,
    expanded: bool,
    subcategory_count: usize,
    set_expanded: WriteSignal<HashSet<String>>,
    adding_under: ReadSignal<Option<String>>,
    set_adding_under: WriteSignal<Option<String>>,
) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let is_selected = {
        let id = id.clone();
        move || store.tree().read().selected_category.as_deref() == Some(id.as_str())
    };
    let is_adding = {
        let id = id.clone();
        move || adding_under.get().as_deref() == Some(id.as_str())
    };
    // Deletes wait for an in-flight refresh too
    let busy = Signal::derive(move || {
        let tree = store.tree().read();
        tree.saving || tree.loading
    });

    let toggle = {
        let id = id.clone();
        move |_: web_sys::MouseEvent| {
            store.tree().write().select_category(&id);
            set_expanded.update(|set| {
                if !set.remove(&id) {
                    set.insert(id.clone());
                }
            });
        }
    };
    let start_adding = {
        let id = id.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            set_expanded.update(|set| {
                set.insert(id.clone());
            });
            set_adding_under.set(Some(id.clone()));
        }
    };
    let add_subcategory = {
        let id = id.clone();
        Callback::new(move |name: String| {
            let id = id.clone();
            set_adding_under.set(None);
            ctx.sync(move |m| async move { m.add_subcategory(&id, &name).await });
        })
    };
    let delete = {
        let id = id.clone();
        Callback::new(move |_: ()| {
            let id = id.clone();
            ctx.sync(move |m| async move { m.delete_category(&id).await });
        })
    };

    view! {
        <div class="category-item">
            <div
                class=move || if is_selected() { "category-row selected" } else { "category-row" }
                on:click=toggle
            >
                <span class="expand-icon">{if expanded { "▼" } else { "▶" }}</span>
                <span class="category-name">{name}</span>
                <span class="row-count">{subcategory_count}</span>
                <button
                    class="add-sub-btn"
                    title="Add subcategory"
                    disabled=move || busy.get()
                    on:click=start_adding
                >
                    "+"
                </button>
                <DeleteConfirmButton button_class="delete-btn" disabled=busy on_confirm=delete />
            </div>
            <Show when=is_adding>
                <NameForm
                    placeholder="Subcategory name"
                    on_submit=add_subcategory
                    on_cancel=Callback::new(move |_: ()| set_adding_under.set(None))
                />
            </Show>
        </div>
    }
}

#[component]
fn SubcategoryRow(category_id: String, id: String, name: String, prompt_count: usize) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let is_selected = {
        let id = id.clone();
        move || store.tree().read().selected_subcategory.as_deref() == Some(id.as_str())
    };
    // Deletes wait for an in-flight refresh too
    let busy = Signal::derive(move || {
        let tree = store.tree().read();
        tree.saving || tree.loading
    });

    let select = {
        let (category_id, id) = (category_id.clone(), id.clone());
        move |_: web_sys::MouseEvent| store.tree().write().select_subcategory(&category_id, &id)
    };
    let delete = Callback::new(move |_: ()| {
        let (category_id, id) = (category_id.clone(), id.clone());
        ctx.sync(move |m| async move { m.delete_subcategory(&category_id, &id).await });
    });

    view! {
        <div
            class=move || if is_selected() { "subcategory-row selected" } else { "subcategory-row" }
            on:click=select
        >
            <span class="subcategory-name">{name}</span>
            <span class="row-count">{prompt_count}</span>
            <DeleteConfirmButton button_class="delete-btn" disabled=busy on_confirm=delete />
        </div>
    }
}
