//! Optimistic Overlay
//!
//! Deletions awaiting confirmation are kept as pending operations and folded
//! over the canonical tree whenever a display tree is needed. Canonical state
//! is only spliced once the service confirms.

use std::borrow::Cow;

use crate::models::Category;
use crate::tree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOp {
    DeleteCategory {
        category_id: String,
    },
    DeleteSubcategory {
        category_id: String,
        subcategory_id: String,
    },
    DeletePrompt {
        prompt_id: String,
    },
}

impl PendingOp {
    pub(crate) fn apply_to(&self, categories: &mut Vec<Category>) {
        match self {
            PendingOp::DeleteCategory { category_id } => {
                tree::remove_category(categories, category_id);
            }
            PendingOp::DeleteSubcategory { category_id, subcategory_id } => {
                tree::remove_subcategory(categories, category_id, subcategory_id);
            }
            PendingOp::DeletePrompt { prompt_id } => {
                tree::remove_prompt(categories, prompt_id);
            }
        }
    }
}

/// Display tree = canonical with every pending op applied in order.
///
/// Borrows canonical untouched when nothing is pending.
pub fn apply<'a>(canonical: &'a [Category], pending: &[PendingOp]) -> Cow<'a, [Category]> {
    if pending.is_empty() {
        return Cow::Borrowed(canonical);
    }
    let mut display = canonical.to_vec();
    for op in pending {
        op.apply_to(&mut display);
    }
    Cow::Owned(display)
}
