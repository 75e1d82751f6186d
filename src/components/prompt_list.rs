//! Prompt List Component
//!
//! Prompts of the selected subcategory with the add-prompt form.

use leptos::prelude::*;
use prompt_sync::NewPrompt;

use crate::components::DeleteConfirmButton;
use crate::context::use_app_context;
use crate::store::{use_app_store, ConsoleStateStoreFields};

const PREVIEW_CHARS: usize = 80;

fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or_default();
    let mut text: String = first_line.chars().take(PREVIEW_CHARS).collect();
    if first_line.chars().count() > PREVIEW_CHARS || content.lines().nth(1).is_some() {
        text.push('…');
    }
    text
}

#[component]
pub fn PromptList() -> impl IntoView {
    let store = use_app_store();

    let subcategory = move || store.tree().read().selected_subcategory();
    let prompts = move || subcategory().map(|s| s.prompts).unwrap_or_default();
    // Only a different subcategory rebuilds the form, not every tree change
    let heading = Memo::new(move |_| subcategory().map(|s| (s.id, s.name)));

    view! {
        <section class="prompt-list">
            {move || match heading.get() {
                Some((id, name)) => view! {
                    <h2>{name}</h2>
                    <NewPromptForm subcategory_id=id />
                }.into_any(),
                None => view! {
                    <p class="empty-hint">"Select a subcategory to see its prompts"</p>
                }.into_any(),
            }}
            <For
                each=prompts
                key=|prompt| (prompt.id.clone(), prompt.title.clone(), prompt.content.clone())
                children=move |prompt| view! { <PromptRow id=prompt.id title=prompt.title content=prompt.content /> }
            />
        </section>
    }
}

#[component]
fn PromptRow(id: String, title: String, content: String) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let is_selected = {
        let id = id.clone();
        move || store.tree().read().selected_prompt.as_deref() == Some(id.as_str())
    };
    let busy = Signal::derive(move || {
        let tree = store.tree().read();
        tree.saving || tree.loading
    });

    let select = {
        let id = id.clone();
        move |_: web_sys::MouseEvent| store.tree().write().set_selected_prompt(Some(id.clone()))
    };
    let delete = Callback::new(move |_: ()| {
        let id = id.clone();
        ctx.sync(move |m| async move { m.delete_prompt(&id).await });
    });

    view! {
        <div
            class=move || if is_selected() { "prompt-row selected" } else { "prompt-row" }
            on:click=select
        >
            <div class="prompt-row-text">
                <span class="prompt-title">{title}</span>
                <span class="prompt-preview">{preview(&content)}</span>
            </div>
            <DeleteConfirmButton button_class="delete-btn" disabled=busy on_confirm=delete />
        </div>
    }
}

/// Title + content form; the prompt lands in the selected subcategory
#[component]
fn NewPromptForm(subcategory_id: String) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (title, set_title) = signal(String::new());
    let (content, set_content) = signal(String::new());

    let saving = move || store.tree().read().saving;

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (new_title, new_content) = (title.get(), content.get());
        if new_title.trim().is_empty() || new_content.trim().is_empty() {
            return;
        }
        // The selected subcategory only resolves under the selected category
        let Some(category_id) = store.tree().read_untracked().selected_category.clone() else {
            return;
        };
        let subcategory_id = subcategory_id.clone();
        set_title.set(String::new());
        set_content.set(String::new());
        ctx.sync(move |m| async move {
            m.add_prompt(&category_id, &subcategory_id, NewPrompt { title: new_title, content: new_content })
                .await
        });
    };

    view! {
        <form class="new-prompt-form" on:submit=submit>
            <input
                type="text"
                placeholder="Prompt title"
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            <textarea
                placeholder="Prompt content"
                prop:value=move || content.get()
                on:input=move |ev| set_content.set(event_target_value(&ev))
            />
            <button type="submit" disabled=saving>"Add Prompt"</button>
        </form>
    }
}
