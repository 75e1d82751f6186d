//! Create / update: apply locally, replace the category remotely, refetch.

use tracing::{info, warn};

use super::PromptManager;
use crate::api::PromptService;
use crate::clock::Clock;
use crate::error::SyncError;
use crate::mapper::to_api;
use crate::models::{Category, CategoryPayload, NewPrompt, Prompt, PromptVersion, Subcategory};
use crate::store::{NoticeVariant, StateHandle, TreeState};
use crate::tree;

/// How to take an optimistic apply back out of the canonical tree
#[derive(Debug, Clone, PartialEq)]
enum Undo {
    RemoveCategory(String),
    RemoveSubcategory { category_id: String, subcategory_id: String },
    RemovePrompt(String),
    RestorePrompt(Prompt),
}

impl Undo {
    /// Entities that vanished in the meantime are left alone
    fn revert(self, categories: &mut Vec<Category>) {
        match self {
            Undo::RemoveCategory(id) => {
                tree::remove_category(categories, &id);
            }
            Undo::RemoveSubcategory { category_id, subcategory_id } => {
                tree::remove_subcategory(categories, &category_id, &subcategory_id);
            }
            Undo::RemovePrompt(id) => {
                tree::remove_prompt(categories, &id);
            }
            Undo::RestorePrompt(previous) => {
                if let Some(prompt) = tree::find_prompt_mut(categories, &previous.id) {
                    *prompt = previous;
                }
            }
        }
    }
}

/// An optimistic apply that is waiting for the service
struct Staged {
    payload: CategoryPayload,
    undo: Undo,
    success: String,
}

fn require_text(value: &str, what: &str) -> Result<(), SyncError> {
    if value.trim().is_empty() {
        return Err(SyncError::Validation(format!("{} cannot be empty", what)));
    }
    Ok(())
}

fn stage_add_category(state: &mut TreeState, name: &str, now: i64) -> Result<Staged, SyncError> {
    let name = name.trim();
    require_text(name, "Category name")?;
    if state.categories.iter().any(|c| tree::same_name(&c.name, name)) {
        return Err(SyncError::DuplicateName { kind: "Category", name: name.to_string() });
    }

    let category = Category {
        id: tree::temp_id(&state.categories, now),
        name: name.to_string(),
        subcategories: Vec::new(),
    };
    let payload = to_api(&category);
    let undo = Undo::RemoveCategory(category.id.clone());
    state.categories.push(category);
    state.push_notice(NoticeVariant::Info, "Adding category...", format!("Creating \"{}\" category", name));

    Ok(Staged { payload, undo, success: format!("Category \"{}\" created successfully", name) })
}

fn stage_add_subcategory(
    state: &mut TreeState,
    category_id: &str,
    name: &str,
    now: i64,
) -> Result<Staged, SyncError> {
    let name = name.trim();
    require_text(name, "Subcategory name")?;
    let id = tree::temp_id(&state.categories, now);
    let category = tree::find_category_mut(&mut state.categories, category_id)
        .ok_or_else(|| SyncError::CategoryNotFound(category_id.to_string()))?;
    if category.subcategories.iter().any(|s| tree::same_name(&s.name, name)) {
        return Err(SyncError::DuplicateName { kind: "Subcategory", name: name.to_string() });
    }

    category.subcategories.push(Subcategory { id: id.clone(), name: name.to_string(), prompts: Vec::new() });
    let payload = to_api(category);
    state.push_notice(NoticeVariant::Info, "Adding subcategory...", format!("Creating \"{}\" subcategory", name));

    Ok(Staged {
        payload,
        undo: Undo::RemoveSubcategory { category_id: category_id.to_string(), subcategory_id: id },
        success: format!("Subcategory \"{}\" created successfully", name),
    })
}

fn stage_add_prompt(
    state: &mut TreeState,
    category_id: &str,
    subcategory_id: &str,
    prompt: &NewPrompt,
    now: i64,
) -> Result<Staged, SyncError> {
    let title = prompt.title.trim();
    require_text(title, "Prompt title")?;
    require_text(&prompt.content, "Prompt content")?;
    if tree::find_category(&state.categories, category_id).is_none() {
        return Err(SyncError::CategoryNotFound(category_id.to_string()));
    }
    let id = tree::temp_id(&state.categories, now);
    let sub = tree::find_subcategory_mut(&mut state.categories, category_id, subcategory_id)
        .ok_or_else(|| SyncError::SubcategoryNotFound(subcategory_id.to_string()))?;
    // Titles key prompts on the service side; a second one would collide
    if sub.prompts.iter().any(|p| tree::same_name(&p.title, title)) {
        return Err(SyncError::DuplicateName { kind: "Prompt", name: title.to_string() });
    }

    sub.prompts.push(Prompt {
        versions: vec![PromptVersion {
            id: Prompt::version_id(&id, 1),
            content: prompt.content.clone(),
            timestamp: now,
            comment: None,
        }],
        id: id.clone(),
        title: title.to_string(),
        content: prompt.content.clone(),
        category_id: category_id.to_string(),
        subcategory_id: subcategory_id.to_string(),
    });
    let payload = tree::find_category(&state.categories, category_id)
        .map(to_api)
        .ok_or_else(|| SyncError::CategoryNotFound(category_id.to_string()))?;

    Ok(Staged {
        payload,
        undo: Undo::RemovePrompt(id),
        success: format!("Prompt \"{}\" created successfully", title),
    })
}

fn stage_update_prompt(
    state: &mut TreeState,
    prompt_id: &str,
    content: &str,
    comment: Option<&str>,
    now: i64,
) -> Result<Staged, SyncError> {
    require_text(content, "Prompt content")?;
    let loc = tree::locate_prompt(&state.categories, prompt_id)
        .ok_or_else(|| SyncError::PromptNotFound(prompt_id.to_string()))?;

    let category = &mut state.categories[loc.category_index];
    let prompt = &mut category.subcategories[loc.subcategory_index].prompts[loc.prompt_index];
    let previous = prompt.clone();
    let version = PromptVersion {
        id: Prompt::version_id(&prompt.id, prompt.versions.len() + 1),
        content: content.to_string(),
        timestamp: now,
        comment: comment.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string),
    };
    prompt.content = content.to_string();
    prompt.versions.insert(0, version);

    Ok(Staged {
        payload: to_api(category),
        undo: Undo::RestorePrompt(previous),
        success: "Prompt updated successfully".to_string(),
    })
}

impl<H, S, C> PromptManager<H, S, C>
where
    H: StateHandle<TreeState>,
    S: PromptService + 'static,
    C: Clock + 'static,
{
    pub async fn add_category(&self, name: &str) {
        let now = self.clock.now_millis();
        let staged = self.state.update(|s| {
            s.error = None;
            stage_add_category(s, name, now)
        });
        self.settle(staged).await;
    }

    pub async fn add_subcategory(&self, category_id: &str, name: &str) {
        let now = self.clock.now_millis();
        let staged = self.state.update(|s| {
            s.error = None;
            stage_add_subcategory(s, category_id, name, now)
        });
        self.settle(staged).await;
    }

    pub async fn add_prompt(&self, category_id: &str, subcategory_id: &str, prompt: NewPrompt) {
        let now = self.clock.now_millis();
        let staged = self.state.update(|s| {
            s.error = None;
            stage_add_prompt(s, category_id, subcategory_id, &prompt, now)
        });
        self.settle(staged).await;
    }

    /// Replace a prompt's content, recording the previous state as history
    pub async fn update_prompt(&self, prompt_id: &str, content: &str, comment: Option<&str>) {
        let now = self.clock.now_millis();
        let staged = self.state.update(|s| {
            s.error = None;
            stage_update_prompt(s, prompt_id, content, comment, now)
        });
        self.settle(staged).await;
    }

    async fn settle(&self, staged: Result<Staged, SyncError>) {
        let Staged { payload, undo, success } = match staged {
            Ok(staged) => staged,
            Err(err) => return self.reject(err),
        };

        self.state.update(|s| s.saving = true);
        match self.service.create_category(&payload).await {
            Ok(_) => {
                info!(category = %payload.name, "category replaced, reconciling");
                self.fetch_categories().await;
                self.state.update(|s| {
                    s.saving = false;
                    // A failed reconcile already reported its own error
                    if s.error.is_none() {
                        s.push_notice(NoticeVariant::Success, "Success", success);
                    }
                });
            }
            Err(err) => {
                warn!(category = %payload.name, error = %err, "replace failed, rolling back");
                self.state.update(|s| {
                    undo.revert(&mut s.categories);
                    s.saving = false;
                    s.report_error(err.to_string());
                });
            }
        }
    }
}
