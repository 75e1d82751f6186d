//! Tree Utilities
//!
//! Lookup, splice and flattening helpers over the category tree.

use std::collections::HashSet;

use crate::models::{Category, Prompt, Subcategory};

/// Position of a prompt inside the tree, plus the stable keys the service
/// addresses it by.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptLocation {
    pub category_index: usize,
    pub subcategory_index: usize,
    pub prompt_index: usize,
    pub category_id: String,
    pub subcategory_id: String,
    pub title: String,
}

pub fn find_category<'a>(categories: &'a [Category], category_id: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.id == category_id)
}

pub fn find_category_mut<'a>(categories: &'a mut [Category], category_id: &str) -> Option<&'a mut Category> {
    categories.iter_mut().find(|c| c.id == category_id)
}

pub fn find_subcategory<'a>(
    categories: &'a [Category],
    category_id: &str,
    subcategory_id: &str,
) -> Option<&'a Subcategory> {
    find_category(categories, category_id)?
        .subcategories
        .iter()
        .find(|s| s.id == subcategory_id)
}

pub fn find_subcategory_mut<'a>(
    categories: &'a mut [Category],
    category_id: &str,
    subcategory_id: &str,
) -> Option<&'a mut Subcategory> {
    find_category_mut(categories, category_id)?
        .subcategories
        .iter_mut()
        .find(|s| s.id == subcategory_id)
}

pub fn locate_prompt(categories: &[Category], prompt_id: &str) -> Option<PromptLocation> {
    for (ci, category) in categories.iter().enumerate() {
        for (si, sub) in category.subcategories.iter().enumerate() {
            if let Some(pi) = sub.prompts.iter().position(|p| p.id == prompt_id) {
                return Some(PromptLocation {
                    category_index: ci,
                    subcategory_index: si,
                    prompt_index: pi,
                    category_id: category.id.clone(),
                    subcategory_id: sub.id.clone(),
                    title: sub.prompts[pi].title.clone(),
                });
            }
        }
    }
    None
}

pub fn find_prompt<'a>(categories: &'a [Category], prompt_id: &str) -> Option<&'a Prompt> {
    let loc = locate_prompt(categories, prompt_id)?;
    Some(&categories[loc.category_index].subcategories[loc.subcategory_index].prompts[loc.prompt_index])
}

pub fn find_prompt_mut<'a>(categories: &'a mut [Category], prompt_id: &str) -> Option<&'a mut Prompt> {
    categories
        .iter_mut()
        .flat_map(|c| c.subcategories.iter_mut())
        .flat_map(|s| s.prompts.iter_mut())
        .find(|p| p.id == prompt_id)
}

/// Remove a category by id. Returns whether anything was removed.
pub fn remove_category(categories: &mut Vec<Category>, category_id: &str) -> bool {
    let before = categories.len();
    categories.retain(|c| c.id != category_id);
    categories.len() != before
}

pub fn remove_subcategory(categories: &mut [Category], category_id: &str, subcategory_id: &str) -> bool {
    let Some(category) = find_category_mut(categories, category_id) else {
        return false;
    };
    let before = category.subcategories.len();
    category.subcategories.retain(|s| s.id != subcategory_id);
    category.subcategories.len() != before
}

pub fn remove_prompt(categories: &mut [Category], prompt_id: &str) -> bool {
    for sub in categories.iter_mut().flat_map(|c| c.subcategories.iter_mut()) {
        let before = sub.prompts.len();
        sub.prompts.retain(|p| p.id != prompt_id);
        if sub.prompts.len() != before {
            return true;
        }
    }
    false
}

/// Whether any entity at any level carries this id
pub fn contains_id(categories: &[Category], id: &str) -> bool {
    categories.iter().any(|c| {
        c.id == id
            || c.subcategories
                .iter()
                .any(|s| s.id == id || s.prompts.iter().any(|p| p.id == id))
    })
}

/// Placeholder id for an entity the service has not named yet: `temp_{now}`,
/// suffixed when that id is already in the tree.
pub fn temp_id(categories: &[Category], now: i64) -> String {
    let base = format!("temp_{}", now);
    if !contains_id(categories, &base) {
        return base;
    }
    (1..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !contains_id(categories, candidate))
        .unwrap_or(base)
}

/// Comparison key for names and titles
pub fn same_name(a: &str, b: &str) -> bool {
    a.trim() == b.trim()
}

// ========================
// Sidebar Flattening
// ========================

/// One visible line of the category sidebar
#[derive(Debug, Clone, PartialEq)]
pub enum TreeRow {
    Category {
        id: String,
        name: String,
        expanded: bool,
        subcategory_count: usize,
    },
    Subcategory {
        category_id: String,
        id: String,
        name: String,
        prompt_count: usize,
    },
}

impl TreeRow {
    pub fn depth(&self) -> usize {
        match self {
            TreeRow::Category { .. } => 0,
            TreeRow::Subcategory { .. } => 1,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            TreeRow::Category { id, .. } | TreeRow::Subcategory { id, .. } => id,
        }
    }
}

/// Rows in display order; subcategories appear only under expanded categories
pub fn visible_rows(categories: &[Category], expanded: &HashSet<String>) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    for category in categories {
        let is_expanded = expanded.contains(&category.id);
        rows.push(TreeRow::Category {
            id: category.id.clone(),
            name: category.name.clone(),
            expanded: is_expanded,
            subcategory_count: category.subcategories.len(),
        });
        if is_expanded {
            rows.extend(category.subcategories.iter().map(|sub| TreeRow::Subcategory {
                category_id: category.id.clone(),
                id: sub.id.clone(),
                name: sub.name.clone(),
                prompt_count: sub.prompts.len(),
            }));
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PromptVersion;

    fn make_prompt(sub: &str, title: &str) -> Prompt {
        let id = Prompt::derived_id(sub, title);
        Prompt {
            versions: vec![PromptVersion {
                id: Prompt::version_id(&id, 1),
                content: format!("{} body", title),
                timestamp: 1,
                comment: None,
            }],
            id,
            title: title.to_string(),
            content: format!("{} body", title),
            category_id: "c1".to_string(),
            subcategory_id: sub.to_string(),
        }
    }

    fn make_tree() -> Vec<Category> {
        vec![
            Category {
                id: "c1".into(),
                name: "One".into(),
                subcategories: vec![
                    Subcategory { id: "s1".into(), name: "A".into(), prompts: vec![make_prompt("s1", "x")] },
                    Subcategory { id: "s2".into(), name: "B".into(), prompts: vec![make_prompt("s2", "y")] },
                ],
            },
            Category { id: "c2".into(), name: "Two".into(), subcategories: vec![] },
        ]
    }

    #[test]
    fn test_locate_prompt() {
        let tree = make_tree();
        let loc = locate_prompt(&tree, "s2_y").unwrap();
        assert_eq!((loc.category_index, loc.subcategory_index, loc.prompt_index), (0, 1, 0));
        assert_eq!(loc.category_id, "c1");
        assert_eq!(loc.subcategory_id, "s2");
        assert_eq!(loc.title, "y");
        assert!(locate_prompt(&tree, "nope").is_none());
    }

    #[test]
    fn test_remove_helpers_report_misses() {
        let mut tree = make_tree();
        assert!(!remove_prompt(&mut tree, "missing"));
        assert!(!remove_subcategory(&mut tree, "c2", "s1"));
        assert!(!remove_category(&mut tree, "c9"));
        assert_eq!(tree, make_tree());

        assert!(remove_prompt(&mut tree, "s1_x"));
        assert!(find_subcategory(&tree, "c1", "s1").unwrap().prompts.is_empty());
        assert!(remove_subcategory(&mut tree, "c1", "s2"));
        assert!(remove_category(&mut tree, "c2"));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_temp_id_avoids_collisions() {
        let mut tree = make_tree();
        assert_eq!(temp_id(&tree, 500), "temp_500");
        tree.push(Category { id: "temp_500".into(), name: "t".into(), subcategories: vec![] });
        assert_eq!(temp_id(&tree, 500), "temp_500_1");
    }

    #[test]
    fn test_visible_rows() {
        let tree = make_tree();
        let collapsed = visible_rows(&tree, &HashSet::new());
        assert_eq!(collapsed.len(), 2);

        let expanded: HashSet<String> = ["c1".to_string()].into_iter().collect();
        let rows = visible_rows(&tree, &expanded);
        // c1 (depth 0), s1 (depth 1), s2 (depth 1), c2 (depth 0)
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].id(), "c1"); assert_eq!(rows[0].depth(), 0);
        assert_eq!(rows[1].id(), "s1"); assert_eq!(rows[1].depth(), 1);
        assert_eq!(rows[2].id(), "s2"); assert_eq!(rows[2].depth(), 1);
        assert_eq!(rows[3].id(), "c2"); assert_eq!(rows[3].depth(), 0);
    }
}
