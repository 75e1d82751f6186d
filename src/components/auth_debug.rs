//! Auth Debug Page
//!
//! Token status, manual login, refresh and clearing, plus the recent log lines.

use leptos::prelude::*;
use prompt_sync::TokenStatus;

use crate::context::use_app_context;
use crate::store::{use_app_store, ConsoleStateStoreFields};

/// Shortened token for display
fn mask_token(token: &str) -> String {
    if token.chars().count() <= 20 {
        return token.to_string();
    }
    let head: String = token.chars().take(10).collect();
    let tail: String = token.chars().rev().take(6).collect::<Vec<_>>().into_iter().rev().collect();
    format!("{}…{}", head, tail)
}

fn status_text(status: TokenStatus) -> (&'static str, &'static str, &'static str) {
    match status {
        TokenStatus::Checking => ("alert", "Checking", "Checking token validity..."),
        TokenStatus::Valid => (
            "alert alert-ok",
            "Valid Token",
            "Your authentication token is valid. You should be able to use the prompt management features.",
        ),
        TokenStatus::Invalid => (
            "alert alert-error",
            "Invalid Token",
            "Your authentication token is invalid or expired. Please log in again.",
        ),
        TokenStatus::Unknown => ("alert alert-error", "No Token Found", "No authentication token found. Please log in."),
    }
}

#[component]
pub fn AuthDebug() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (remember, set_remember) = signal(false);
    let (log_lines, set_log_lines) = signal(rolling_logger::recent_lines());

    ctx.auth(|d| async move { d.init().await });

    let loading = move || store.auth().read().loading;
    let status = move || status_text(store.auth().read().status);

    let login = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (email, password, remember) = (email.get(), password.get(), remember.get());
        ctx.auth(move |d| async move { d.login(&email, &password, remember).await });
    };

    view! {
        <section class="auth-debug">
            <h2>"Authentication Debug"</h2>

            <div class=move || status().0>
                <strong>{move || status().1}</strong>
                <p>{move || status().2}</p>
            </div>

            <div class="token-row">
                <span>"Current token: "</span>
                <code>{move || store.auth().read().token.as_deref().map(mask_token).unwrap_or_else(|| "none".to_string())}</code>
            </div>

            {move || store.auth().read().success_message.clone().map(|m| view! {
                <div class="alert alert-ok"><strong>"Success"</strong><p>{m}</p></div>
            })}
            {move || store.auth().read().error.clone().map(|e| view! {
                <div class="alert alert-error"><strong>"Error"</strong><p>{e}</p></div>
            })}

            <form class="login-form" on:submit=login>
                <label>"Email"
                    <input
                        type="email"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </label>
                <label>"Password"
                    <input
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </label>
                <label class="checkbox">
                    <input
                        type="checkbox"
                        prop:checked=move || remember.get()
                        on:change=move |ev| set_remember.set(event_target_checked(&ev))
                    />
                    "Remember credentials for token refresh"
                </label>
                <button type="submit" disabled=loading>"Login"</button>
            </form>

            <div class="auth-actions">
                <button
                    disabled=move || loading() || store.auth().read().token.is_none()
                    on:click=move |_| {
                        let token = store.auth().read_untracked().token.clone();
                        if let Some(token) = token {
                            ctx.auth(move |d| async move { d.check_token(&token).await });
                        }
                    }
                >
                    "Check Token"
                </button>
                <button disabled=loading on:click=move |_| ctx.debugger().clear_token()>"Clear Token"</button>
                <button
                    disabled=move || loading() || !store.auth().read().has_stored_credentials
                    on:click=move |_| ctx.auth(|d| async move { d.refresh_token().await })
                >
                    "Refresh Token"
                </button>
                <button
                    disabled=move || !store.auth().read().has_stored_credentials
                    on:click=move |_| ctx.debugger().clear_credentials()
                >
                    "Clear Stored Credentials"
                </button>
            </div>

            <div class="log-panel">
                <div class="log-header">
                    <h3>"Recent log"</h3>
                    <button on:click=move |_| set_log_lines.set(rolling_logger::recent_lines())>"Reload"</button>
                    <button on:click=move |_| {
                        rolling_logger::clear();
                        set_log_lines.set(Vec::new());
                    }>"Clear"</button>
                </div>
                <pre class="log-lines">{move || log_lines.get().join("\n")}</pre>
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("short"), "short");
        assert_eq!(mask_token("abcdefghijklmnopqrstuvwxyz"), "abcdefghij…uvwxyz");
    }

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(TokenStatus::Valid).1, "Valid Token");
        assert_eq!(status_text(TokenStatus::Unknown).1, "No Token Found");
    }
}
