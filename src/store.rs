//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The sync core
//! mutates the store through the handles below.

use leptos::prelude::*;
use reactive_stores::Store;

use prompt_sync::{AuthDebugState, StateHandle, TreeState};

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct ConsoleState {
    /// Prompt tree, selection, flags and toasts
    pub tree: TreeState,
    /// Auth-debug page
    pub auth: AuthDebugState,
}

/// Type alias for the store
pub type ConsoleStore = Store<ConsoleState>;

/// Get the app store from context
pub fn use_app_store() -> ConsoleStore {
    expect_context::<ConsoleStore>()
}

// ========================
// Sync Handles
// ========================

/// Tree slice of the store as seen by `PromptManager`
#[derive(Clone, Copy)]
pub struct TreeHandle(pub ConsoleStore);

impl StateHandle<TreeState> for TreeHandle {
    fn read<R>(&self, f: impl FnOnce(&TreeState) -> R) -> R {
        f(&self.0.tree().read_untracked())
    }

    fn update<R>(&self, f: impl FnOnce(&mut TreeState) -> R) -> R {
        f(&mut self.0.tree().write())
    }
}

/// Auth slice of the store as seen by `AuthDebugger`
#[derive(Clone, Copy)]
pub struct AuthHandle(pub ConsoleStore);

impl StateHandle<AuthDebugState> for AuthHandle {
    fn read<R>(&self, f: impl FnOnce(&AuthDebugState) -> R) -> R {
        f(&self.0.auth().read_untracked())
    }

    fn update<R>(&self, f: impl FnOnce(&mut AuthDebugState) -> R) -> R {
        f(&mut self.0.auth().write())
    }
}
