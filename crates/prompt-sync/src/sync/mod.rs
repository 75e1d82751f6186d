//! Optimistic Mutation Protocol
//!
//! Creates and updates are applied to the canonical tree at once, sent as a
//! full category replacement, then superseded by a fresh snapshot from the
//! service (the snapshot carries the real ids). Deletes are shown through the
//! overlay and only spliced from canonical state after confirmation.
//!
//! Public operations never return errors: failures end up in
//! `TreeState::error` and as an error notice.

mod create;
mod delete;

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::api::PromptService;
use crate::clock::{Clock, SystemClock};
use crate::error::SyncError;
use crate::mapper;
use crate::store::{StateHandle, TreeState};

pub struct PromptManager<H, S, C = SystemClock> {
    state: H,
    service: Rc<S>,
    clock: Rc<C>,
}

impl<H: Clone, S, C> Clone for PromptManager<H, S, C> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            service: Rc::clone(&self.service),
            clock: Rc::clone(&self.clock),
        }
    }
}

impl<H, S, C> PromptManager<H, S, C>
where
    H: StateHandle<TreeState>,
    S: PromptService + 'static,
    C: Clock + 'static,
{
    pub fn new(state: H, service: Rc<S>, clock: Rc<C>) -> Self {
        Self { state, service, clock }
    }

    pub fn state(&self) -> &H {
        &self.state
    }

    /// Replace the whole tree with the service's current snapshot
    pub async fn fetch_categories(&self) {
        let seq = self.state.update(|s| {
            s.error = None;
            s.begin_fetch()
        });
        let result = self.service.list_categories().await;
        let now = self.clock.now_millis();

        self.state.update(|s| {
            match result {
                Ok(api_categories) => {
                    if s.accept_fetch(seq) {
                        s.apply_snapshot(seq, mapper::to_internal(&api_categories, now));
                        info!(categories = s.categories.len(), "prompt categories loaded");
                    } else {
                        debug!(seq, "dropping stale category snapshot");
                    }
                }
                Err(err) if s.is_current_fetch(seq) => {
                    warn!(error = %err, "failed to fetch prompt categories");
                    s.report_error(err.to_string());
                }
                Err(err) => {
                    debug!(seq, error = %err, "ignoring failure of a superseded fetch");
                }
            }
            s.finish_fetch(seq);
        });
    }

    /// The automatic fetch on mount; runs at most once per store
    pub async fn fetch_on_mount(&self) {
        if self.state.update(|s| s.claim_initial_fetch()) {
            self.fetch_categories().await;
        }
    }

    /// Local validation failure: nothing was applied, nothing was sent
    fn reject(&self, err: SyncError) {
        warn!(error = %err, "mutation rejected before sending");
        self.state.update(|s| s.report_error(err.to_string()));
    }
}
