//! Prompt Editor Column
//!
//! Edits the selected prompt's content; every save adds a version. The
//! history list can load an older version back into the editor.

use leptos::prelude::*;
use prompt_sync::PromptVersion;

use crate::context::use_app_context;
use crate::store::{use_app_store, ConsoleStateStoreFields};

fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

#[component]
pub fn PromptEditor() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let prompt = Memo::new(move |_| store.tree().read().selected_prompt());
    let (draft, set_draft) = signal(String::new());
    let (comment, set_comment) = signal(String::new());
    let (last_prompt_id, set_last_prompt_id) = signal::<Option<String>>(None);

    // Load the draft when another prompt gets selected
    Effect::new(move |_| {
        let current = prompt.get();
        let current_id = current.as_ref().map(|p| p.id.clone());
        if current_id != last_prompt_id.get_untracked() {
            set_last_prompt_id.set(current_id);
            set_draft.set(current.map(|p| p.content).unwrap_or_default());
            set_comment.set(String::new());
        }
    });

    let dirty = move || prompt.get().is_some_and(|p| p.content != draft.get());
    let saving = move || store.tree().read().saving;

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(id) = prompt.get_untracked().map(|p| p.id) else {
            return;
        };
        let (content, note) = (draft.get_untracked(), comment.get_untracked());
        set_comment.set(String::new());
        ctx.sync(move |m| async move {
            let note = Some(note.as_str()).filter(|n| !n.trim().is_empty());
            m.update_prompt(&id, &content, note).await
        });
    };

    view! {
        <section class="prompt-editor">
            {move || match prompt.get() {
                None => view! { <p class="empty-hint">"Select a prompt to edit it"</p> }.into_any(),
                Some(p) => view! {
                    <h2>{p.title.clone()}</h2>
                    <form class="editor-form" on:submit=save>
                        <textarea
                            class="editor-textarea"
                            prop:value=move || draft.get()
                            on:input=move |ev| set_draft.set(event_target_value(&ev))
                        />
                        <input
                            type="text"
                            placeholder="Version comment (optional)"
                            prop:value=move || comment.get()
                            on:input=move |ev| set_comment.set(event_target_value(&ev))
                        />
                        <button type="submit" disabled=move || !dirty() || saving()>"Save Version"</button>
                    </form>
                    <VersionHistory versions=p.versions set_draft=set_draft />
                }.into_any(),
            }}
        </section>
    }
}

/// Newest first
#[component]
fn VersionHistory(versions: Vec<PromptVersion>, set_draft: WriteSignal<String>) -> impl IntoView {
    let count = versions.len();

    view! {
        <div class="version-history">
            <h3>{format!("History ({})", count)}</h3>
            <ul>
                {versions
                    .into_iter()
                    .enumerate()
                    .map(|(index, version)| {
                        let content = version.content.clone();
                        view! {
                            <li class="version-item">
                                <div class="version-meta">
                                    <span class="version-number">{format!("v{}", count - index)}</span>
                                    <span class="version-time">{format_timestamp(version.timestamp)}</span>
                                    {version.comment.map(|c| view! { <span class="version-comment">{c}</span> })}
                                </div>
                                <pre class="version-content">{version.content}</pre>
                                <button
                                    class="version-load-btn"
                                    disabled={index == 0}
                                    on:click=move |_| set_draft.set(content.clone())
                                >
                                    "Load into editor"
                                </button>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </div>
    }
}
