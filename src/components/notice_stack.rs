//! Notice Stack Component
//!
//! Toasts in the bottom corner. Each one dismisses itself after a delay.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use prompt_sync::{Notice, NoticeVariant};

use crate::store::{use_app_store, ConsoleStateStoreFields};

const DISMISS_AFTER_MS: u32 = 4_000;

fn variant_class(variant: NoticeVariant) -> &'static str {
    match variant {
        NoticeVariant::Info => "notice notice-info",
        NoticeVariant::Success => "notice notice-success",
        NoticeVariant::Error => "notice notice-error",
    }
}

#[component]
pub fn NoticeStack() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="notice-stack">
            <For
                each=move || store.tree().read().notices.clone()
                key=|notice| notice.id
                children=move |notice| view! { <NoticeCard notice=notice /> }
            />
        </div>
    }
}

#[component]
fn NoticeCard(notice: Notice) -> impl IntoView {
    let store = use_app_store();
    let id = notice.id;

    spawn_local(async move {
        TimeoutFuture::new(DISMISS_AFTER_MS).await;
        store.tree().write().dismiss_notice(id);
    });

    view! {
        <div class=variant_class(notice.variant) role="status">
            <div class="notice-text">
                <strong>{notice.title}</strong>
                <p>{notice.description}</p>
            </div>
            <button class="notice-close" on:click=move |_| store.tree().write().dismiss_notice(id)>"×"</button>
        </div>
    }
}
