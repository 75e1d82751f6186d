//! Header Component
//!
//! Title, page tabs, refresh and the add-category form.

use leptos::prelude::*;

use crate::components::NameForm;
use crate::context::{use_app_context, ConsoleView};
use crate::store::{use_app_store, ConsoleStateStoreFields};

#[component]
pub fn Header() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (adding, set_adding) = signal(false);

    let busy = move || {
        let tree = store.tree().read();
        tree.loading || tree.saving
    };
    let on_prompts = move || ctx.view.get() == ConsoleView::Prompts;

    let add_category = Callback::new(move |name: String| {
        set_adding.set(false);
        ctx.sync(move |m| async move { m.add_category(&name).await });
    });

    view! {
        <header class="console-header">
            <h1>"Prompt Console"</h1>
            <ViewTabs />
            <Show when=on_prompts>
                <div class="header-actions">
                    <Show when=busy>
                        <span class="busy-indicator">"Saving..."</span>
                    </Show>
                    <button
                        class="refresh-btn"
                        disabled=busy
                        on:click=move |_| ctx.sync(|m| async move { m.fetch_categories().await })
                    >
                        "Refresh"
                    </button>
                    {move || if adding.get() {
                        view! {
                            <NameForm
                                placeholder="Category name"
                                on_submit=add_category
                                on_cancel=Callback::new(move |_: ()| set_adding.set(false))
                            />
                        }.into_any()
                    } else {
                        view! {
                            <button
                                class="add-category-btn"
                                disabled=busy
                                on:click=move |_| set_adding.set(true)
                            >
                                "+ Category"
                            </button>
                        }.into_any()
                    }}
                </div>
            </Show>
        </header>
    }
}

/// Tabs for switching between the prompt pages and the auth-debug page
#[component]
fn ViewTabs() -> impl IntoView {
    let ctx = use_app_context();

    let tab = move |view: ConsoleView, label: &'static str| {
        let tab_class = move || if ctx.view.get() == view { "view-tab active" } else { "view-tab" };
        view! {
            <button class=tab_class on:click=move |_| ctx.show(view)>
                {label}
            </button>
        }
    };

    view! {
        <nav class="view-tabs">
            {tab(ConsoleView::Prompts, "Prompts")}
            {tab(ConsoleView::AuthDebug, "Auth Debug")}
        </nav>
    }
}
