//! Prompt Console App
//!
//! Header over a three-column layout: category tree, prompt list, editor.

use leptos::prelude::*;
use reactive_stores::Store;

use prompt_sync::ApiConfig;

use crate::components::{AuthDebug, CategoryTree, Header, NoticeStack, PromptEditor, PromptList};
use crate::context::{AppContext, ConsoleView};
use crate::store::{ConsoleState, ConsoleStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let store = Store::new(ConsoleState::default());
    provide_context(store);

    let config = ApiConfig::from_env();
    tracing::info!(base_url = %config.base_url, "prompt console starting");
    let ctx = AppContext::new(store, config);
    provide_context(ctx);

    // Initial load; the store guards against a second automatic fetch
    ctx.sync(|m| async move { m.fetch_on_mount().await });

    let error = move || store.tree().read().error.clone();

    view! {
        <div class="app-shell">
            <Header />
            {move || error().map(|message| view! {
                <div class="error-banner" role="alert">
                    <span>{message}</span>
                    <button on:click=move |_| store.tree().write().error = None>"×"</button>
                </div>
            })}
            {move || match ctx.view.get() {
                ConsoleView::Prompts => view! {
                    <div class="app-layout">
                        <CategoryTree />
                        <main class="main-content">
                            <PromptList />
                        </main>
                        <PromptEditor />
                    </div>
                }.into_any(),
                ConsoleView::AuthDebug => view! { <AuthDebug /> }.into_any(),
            }}
            <NoticeStack />
        </div>
    }
}
