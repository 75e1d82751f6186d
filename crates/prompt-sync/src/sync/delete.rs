//! Deletes: hide through the overlay, splice canonical state on confirmation.

use tracing::{info, warn};

use super::PromptManager;
use crate::api::PromptService;
use crate::clock::Clock;
use crate::error::{ApiError, SyncError};
use crate::models::ApiAck;
use crate::overlay::PendingOp;
use crate::store::{NoticeVariant, StateHandle, TreeState};
use crate::tree;

fn stage_delete_prompt(state: &mut TreeState, prompt_id: &str) -> Result<(PendingOp, tree::PromptLocation), SyncError> {
    let loc = tree::locate_prompt(&state.categories, prompt_id)
        .ok_or_else(|| SyncError::PromptNotFound(prompt_id.to_string()))?;
    if state.selected_prompt.as_deref() == Some(prompt_id) {
        state.set_selected_prompt(None);
    }
    let op = PendingOp::DeletePrompt { prompt_id: prompt_id.to_string() };
    state.pending.push(op.clone());
    state.saving = true;
    Ok((op, loc))
}

fn stage_delete_category(state: &mut TreeState, category_id: &str) -> Result<PendingOp, SyncError> {
    if tree::find_category(&state.categories, category_id).is_none() {
        return Err(SyncError::CategoryNotFound(category_id.to_string()));
    }
    if state.selected_category.as_deref() == Some(category_id) {
        state.clear_selection();
    }
    // Lower levels may still point inside after the category selection moved on
    let holds_subcategory = state
        .selected_subcategory
        .as_deref()
        .is_some_and(|id| tree::find_subcategory(&state.categories, category_id, id).is_some());
    if holds_subcategory {
        state.set_selected_subcategory(None);
    }
    let holds_prompt = state
        .selected_prompt
        .as_deref()
        .and_then(|id| tree::locate_prompt(&state.categories, id))
        .is_some_and(|loc| loc.category_id == category_id);
    if holds_prompt {
        state.set_selected_prompt(None);
    }
    let op = PendingOp::DeleteCategory { category_id: category_id.to_string() };
    state.pending.push(op.clone());
    state.saving = true;
    Ok(op)
}

fn stage_delete_subcategory(
    state: &mut TreeState,
    category_id: &str,
    subcategory_id: &str,
) -> Result<PendingOp, SyncError> {
    if tree::find_category(&state.categories, category_id).is_none() {
        return Err(SyncError::CategoryNotFound(category_id.to_string()));
    }
    if tree::find_subcategory(&state.categories, category_id, subcategory_id).is_none() {
        return Err(SyncError::SubcategoryNotFound(subcategory_id.to_string()));
    }
    if state.selected_subcategory.as_deref() == Some(subcategory_id) {
        state.set_selected_subcategory(None);
        state.set_selected_prompt(None);
    }
    let holds_prompt = state
        .selected_prompt
        .as_deref()
        .and_then(|id| tree::locate_prompt(&state.categories, id))
        .is_some_and(|loc| loc.category_id == category_id && loc.subcategory_id == subcategory_id);
    if holds_prompt {
        state.set_selected_prompt(None);
    }
    let op = PendingOp::DeleteSubcategory {
        category_id: category_id.to_string(),
        subcategory_id: subcategory_id.to_string(),
    };
    state.pending.push(op.clone());
    state.saving = true;
    Ok(op)
}

impl<H, S, C> PromptManager<H, S, C>
where
    H: StateHandle<TreeState>,
    S: PromptService + 'static,
    C: Clock + 'static,
{
    pub async fn delete_prompt(&self, prompt_id: &str) {
        let staged = self.state.update(|s| {
            s.error = None;
            stage_delete_prompt(s, prompt_id)
        });
        let (op, loc) = match staged {
            Ok(staged) => staged,
            Err(err) => return self.reject(err),
        };

        // The service keys prompts by title within the subcategory
        let result = self
            .service
            .delete_prompt(&loc.category_id, &loc.subcategory_id, &loc.title)
            .await;
        self.confirm(op, result, "Prompt deleted successfully");
    }

    /// Remove a category and everything under it
    pub async fn delete_category(&self, category_id: &str) {
        let staged = self.state.update(|s| {
            s.error = None;
            stage_delete_category(s, category_id)
        });
        let op = match staged {
            Ok(op) => op,
            Err(err) => return self.reject(err),
        };

        let result = self.service.delete_category(category_id).await;
        self.confirm(op, result, "Category deleted successfully");
    }

    pub async fn delete_subcategory(&self, category_id: &str, subcategory_id: &str) {
        let staged = self.state.update(|s| {
            s.error = None;
            stage_delete_subcategory(s, category_id, subcategory_id)
        });
        let op = match staged {
            Ok(op) => op,
            Err(err) => return self.reject(err),
        };

        let result = self.service.delete_subcategory(category_id, subcategory_id).await;
        self.confirm(op, result, "Subcategory deleted successfully");
    }

    /// Settle a pending delete. The op leaves the overlay either way; canonical
    /// state only changes when the service confirmed.
    fn confirm(&self, op: PendingOp, result: Result<ApiAck, ApiError>, success: &str) {
        self.state.update(|s| {
            s.clear_pending(&op);
            s.saving = false;
            match result {
                Ok(_) => {
                    info!(?op, "delete confirmed");
                    s.commit_delete(op);
                    s.push_notice(NoticeVariant::Success, "Success", success);
                }
                Err(err) => {
                    warn!(?op, error = %err, "delete failed, restoring");
                    s.report_error(err.to_string());
                }
            }
        });
    }
}
