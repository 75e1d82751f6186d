//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use prompt_sync::{
    ApiConfig, AuthDebugger, HttpCredentialProvider, HttpPromptService, KeyValueStorage, PromptManager,
    SystemClock,
};

use crate::storage::BrowserStorage;
use crate::store::{AuthHandle, ConsoleStore, TreeHandle};

pub type Manager = PromptManager<TreeHandle, HttpPromptService, SystemClock>;
pub type Debugger = AuthDebugger<AuthHandle, HttpCredentialProvider>;

/// Top-level page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleView {
    Prompts,
    AuthDebug,
}

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    manager: StoredValue<Manager, LocalStorage>,
    debugger: StoredValue<Debugger, LocalStorage>,
    /// Current page - read
    pub view: ReadSignal<ConsoleView>,
    /// Current page - write
    set_view: WriteSignal<ConsoleView>,
}

impl AppContext {
    pub fn new(store: ConsoleStore, config: ApiConfig) -> Self {
        let storage: Rc<dyn KeyValueStorage> = Rc::new(BrowserStorage);
        let service = HttpPromptService::new(config.clone(), Rc::clone(&storage));
        let provider = HttpCredentialProvider::new(config, storage);
        let (view, set_view) = signal(ConsoleView::Prompts);

        Self {
            manager: StoredValue::new_local(PromptManager::new(
                TreeHandle(store),
                Rc::new(service),
                Rc::new(SystemClock),
            )),
            debugger: StoredValue::new_local(AuthDebugger::new(AuthHandle(store), Rc::new(provider))),
            view,
            set_view,
        }
    }

    pub fn show(&self, view: ConsoleView) {
        self.set_view.set(view);
    }

    /// Run a prompt operation in the background
    pub fn sync<F, Fut>(&self, op: F)
    where
        F: FnOnce(Manager) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        spawn_local(op(self.manager.get_value()));
    }

    /// Run an auth-debug operation in the background
    pub fn auth<F, Fut>(&self, op: F)
    where
        F: FnOnce(Debugger) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        spawn_local(op(self.debugger.get_value()));
    }

    /// For the synchronous auth-debug operations
    pub fn debugger(&self) -> Debugger {
        self.debugger.get_value()
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
