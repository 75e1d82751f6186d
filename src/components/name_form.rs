//! Name Form Component
//!
//! Inline single-field form used to name a new category or subcategory.

use leptos::prelude::*;

#[component]
pub fn NameForm(
    #[prop(into)] placeholder: String,
    #[prop(into)] on_submit: Callback<String>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let (name, set_name) = signal(String::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let value = name.get();
        if value.trim().is_empty() {
            return;
        }
        on_submit.run(value.trim().to_string());
        set_name.set(String::new());
    };

    view! {
        <form class="name-form" on:submit=submit>
            <input
                type="text"
                placeholder=placeholder
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
                on:keydown=move |ev: web_sys::KeyboardEvent| {
                    if ev.key() == "Escape" {
                        on_cancel.run(());
                    }
                }
            />
            <button type="submit">"+"</button>
            <button type="button" on:click=move |_| on_cancel.run(())>"×"</button>
        </form>
    }
}
