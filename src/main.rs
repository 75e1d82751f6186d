//! Prompt Console Frontend Entry Point

mod app;
mod components;
mod context;
mod storage;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = rolling_logger::init_logger("PromptConsole", rolling_logger::DEFAULT_CAPACITY) {
        web_sys::console::error_1(&format!("failed to init rolling logger: {}", e).into());
    }
    mount_to_body(App);
}
