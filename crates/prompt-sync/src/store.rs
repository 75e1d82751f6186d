//! Tree State Store
//!
//! Plain state for the prompt tree, selection and UI flags. Where the state
//! lives is abstracted by [`StateHandle`] so the same protocol can drive a
//! reactive UI store or a `Rc<RefCell<_>>` in tests.

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use crate::mapper;
use crate::models::{Category, Prompt, Subcategory};
use crate::overlay::{self, PendingOp};
use crate::tree;

/// Access to shared state. Closures must not hold the state across an `.await`.
pub trait StateHandle<T>: Clone + 'static {
    /// Untracked read
    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R;
    fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;
}

impl<T: 'static> StateHandle<T> for Rc<RefCell<T>> {
    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.borrow())
    }

    fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeVariant {
    Info,
    Success,
    Error,
}

/// Toast shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeState {
    /// Canonical tree: last server snapshot plus unconfirmed creates/updates
    pub categories: Vec<Category>,
    pub selected_category: Option<String>,
    pub selected_subcategory: Option<String>,
    pub selected_prompt: Option<String>,
    pub loading: bool,
    /// A mutation is in flight; controls should be disabled
    pub saving: bool,
    pub error: Option<String>,
    /// Deletions shown as done while the service has not confirmed them
    pub pending: Vec<PendingOp>,
    pub notices: Vec<Notice>,
    next_notice_id: u64,
    fetch_started: u64,
    fetch_applied: u64,
    /// Confirmed deletes, tagged with the last fetch started before confirmation
    confirmed_deletes: Vec<(u64, PendingOp)>,
    initial_fetch_done: bool,
}

impl TreeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(categories: Vec<Category>) -> Self {
        Self { categories, ..Self::default() }
    }

    // ========================
    // Display
    // ========================

    /// Canonical tree with pending deletions folded in; render from this only
    pub fn display(&self) -> Cow<'_, [Category]> {
        overlay::apply(&self.categories, &self.pending)
    }

    pub fn has_optimistic_state(&self) -> bool {
        !self.pending.is_empty()
    }

    // ========================
    // Selection
    // ========================

    pub fn set_selected_category(&mut self, category_id: Option<String>) {
        self.selected_category = category_id;
    }

    pub fn set_selected_subcategory(&mut self, subcategory_id: Option<String>) {
        self.selected_subcategory = subcategory_id;
    }

    pub fn set_selected_prompt(&mut self, prompt_id: Option<String>) {
        self.selected_prompt = prompt_id;
    }

    /// Select a category from the sidebar; a different category drops the
    /// subcategory and prompt below it
    pub fn select_category(&mut self, category_id: &str) {
        if self.selected_category.as_deref() != Some(category_id) {
            self.set_selected_subcategory(None);
            self.set_selected_prompt(None);
        }
        self.set_selected_category(Some(category_id.to_string()));
    }

    /// Select a subcategory from the sidebar: parent set, prompt cleared
    pub fn select_subcategory(&mut self, category_id: &str, subcategory_id: &str) {
        self.set_selected_category(Some(category_id.to_string()));
        self.set_selected_subcategory(Some(subcategory_id.to_string()));
        self.set_selected_prompt(None);
    }

    pub fn clear_selection(&mut self) {
        self.selected_category = None;
        self.selected_subcategory = None;
        self.selected_prompt = None;
    }

    pub fn selected_category(&self) -> Option<Category> {
        let id = self.selected_category.as_deref()?;
        tree::find_category(&self.display(), id).cloned()
    }

    /// Resolves only when the subcategory sits under the selected category
    pub fn selected_subcategory(&self) -> Option<Subcategory> {
        let category_id = self.selected_category.as_deref()?;
        let subcategory_id = self.selected_subcategory.as_deref()?;
        tree::find_subcategory(&self.display(), category_id, subcategory_id).cloned()
    }

    /// Resolves only when the prompt sits under the selected subcategory
    pub fn selected_prompt(&self) -> Option<Prompt> {
        let subcategory = self.selected_subcategory()?;
        let prompt_id = self.selected_prompt.as_deref()?;
        subcategory.prompts.into_iter().find(|p| p.id == prompt_id)
    }

    // ========================
    // Notices
    // ========================

    pub fn push_notice(&mut self, variant: NoticeVariant, title: &str, description: impl Into<String>) -> u64 {
        self.next_notice_id += 1;
        let id = self.next_notice_id;
        self.notices.push(Notice {
            id,
            title: title.to_string(),
            description: description.into(),
            variant,
        });
        id
    }

    pub fn dismiss_notice(&mut self, id: u64) {
        self.notices.retain(|n| n.id != id);
    }

    /// Record a failure: `error` field plus an error toast
    pub fn report_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.push_notice(NoticeVariant::Error, "Error", message.clone());
        self.error = Some(message);
    }

    // ========================
    // Fetch Bookkeeping
    // ========================

    /// One-shot guard for the automatic fetch on mount; true the first time only
    pub fn claim_initial_fetch(&mut self) -> bool {
        !std::mem::replace(&mut self.initial_fetch_done, true)
    }

    pub(crate) fn begin_fetch(&mut self) -> u64 {
        self.fetch_started += 1;
        self.loading = true;
        self.fetch_started
    }

    /// Whether a fetch response may replace the tree; a response older than
    /// one already applied is stale.
    pub(crate) fn accept_fetch(&mut self, seq: u64) -> bool {
        if seq < self.fetch_applied {
            return false;
        }
        self.fetch_applied = seq;
        true
    }

    /// A failed fetch only counts when no newer snapshot has been applied
    pub(crate) fn is_current_fetch(&self, seq: u64) -> bool {
        seq >= self.fetch_applied
    }

    /// Replace canonical state with an accepted snapshot. Deletes confirmed
    /// after fetch `seq` started may be missing from it and are applied again.
    pub(crate) fn apply_snapshot(&mut self, seq: u64, mut fresh: Vec<Category>) {
        self.confirmed_deletes.retain(|(started, _)| *started >= seq);
        for (_, op) in &self.confirmed_deletes {
            op.apply_to(&mut fresh);
        }
        self.categories = mapper::carry_history(&self.categories, fresh);
    }

    /// Splice a confirmed delete from canonical state
    pub(crate) fn commit_delete(&mut self, op: PendingOp) {
        op.apply_to(&mut self.categories);
        self.confirmed_deletes.push((self.fetch_started, op));
    }

    pub(crate) fn finish_fetch(&mut self, seq: u64) {
        if seq >= self.fetch_started {
            self.loading = false;
        }
    }

    pub(crate) fn clear_pending(&mut self, op: &PendingOp) {
        if let Some(pos) = self.pending.iter().position(|p| p == op) {
            self.pending.remove(pos);
        }
    }
}
