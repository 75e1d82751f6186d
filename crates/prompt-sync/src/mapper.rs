//! Data Mapper
//!
//! Conversions between the service's wire shape and the internal tree.

use std::collections::HashMap;

use crate::models::{
    ApiCategory, Category, CategoryPayload, Prompt, PromptVersion, Subcategory,
};

/// Expand wire categories into the internal tree.
///
/// Every prompt gets the derived id `{subcategory_id}_{title}` and a single
/// synthetic version stamped `now`.
pub fn to_internal(api_categories: &[ApiCategory], now: i64) -> Vec<Category> {
    api_categories
        .iter()
        .map(|api_category| Category {
            id: api_category.category_id.clone(),
            name: api_category.category_name.clone(),
            subcategories: api_category
                .subcategories
                .iter()
                .map(|api_sub| Subcategory {
                    id: api_sub.subcategory_id.clone(),
                    name: api_sub.subcategory_name.clone(),
                    prompts: api_sub
                        .prompts
                        .iter()
                        .map(|(title, content)| {
                            let id = Prompt::derived_id(&api_sub.subcategory_id, title);
                            Prompt {
                                versions: vec![PromptVersion {
                                    id: Prompt::version_id(&id, 1),
                                    content: content.clone(),
                                    timestamp: now,
                                    comment: None,
                                }],
                                id,
                                title: title.clone(),
                                content: content.clone(),
                                category_id: api_category.category_id.clone(),
                                subcategory_id: api_sub.subcategory_id.clone(),
                            }
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

/// Flatten one category into the replacement payload.
///
/// Ids, versions and timestamps are dropped: the service only knows names,
/// titles and current content.
pub fn to_api(category: &Category) -> CategoryPayload {
    CategoryPayload {
        name: category.name.clone(),
        subcategories: category
            .subcategories
            .iter()
            .map(|sub| {
                let prompts = sub
                    .prompts
                    .iter()
                    .map(|p| (p.title.clone(), p.content.clone()))
                    .collect();
                (sub.name.clone(), prompts)
            })
            .collect(),
    }
}

/// Re-attach locally recorded version history to a freshly fetched tree.
///
/// A fresh prompt inherits the previous history when a prompt with the same id
/// existed and its head content matches what the server now reports.
pub fn carry_history(previous: &[Category], mut fresh: Vec<Category>) -> Vec<Category> {
    let known: HashMap<&str, &Prompt> = previous
        .iter()
        .flat_map(|c| c.subcategories.iter())
        .flat_map(|s| s.prompts.iter())
        .map(|p| (p.id.as_str(), p))
        .collect();

    if known.is_empty() {
        return fresh;
    }

    for prompt in fresh
        .iter_mut()
        .flat_map(|c| c.subcategories.iter_mut())
        .flat_map(|s| s.prompts.iter_mut())
    {
        if let Some(old) = known.get(prompt.id.as_str()) {
            if old.content == prompt.content && !old.versions.is_empty() {
                prompt.versions = old.versions.clone();
            }
        }
    }
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApiSubcategory;
    use std::collections::BTreeMap;

    fn api_tree() -> Vec<ApiCategory> {
        let mut prompts = BTreeMap::new();
        prompts.insert("Greeting".to_string(), "Hello".to_string());
        prompts.insert("Farewell".to_string(), "Bye".to_string());
        vec![ApiCategory {
            category_id: "c1".into(),
            category_name: "Support".into(),
            subcategories: vec![
                ApiSubcategory {
                    subcategory_id: "s1".into(),
                    subcategory_name: "Openers".into(),
                    prompts,
                },
                ApiSubcategory {
                    subcategory_id: "s2".into(),
                    subcategory_name: "Empty".into(),
                    prompts: BTreeMap::new(),
                },
            ],
        }]
    }

    /// What the service would hand back after storing `payload` under fresh ids
    fn served(payload: &CategoryPayload, tag: &str) -> ApiCategory {
        ApiCategory {
            category_id: format!("{}_cat", tag),
            category_name: payload.name.clone(),
            subcategories: payload
                .subcategories
                .iter()
                .map(|(name, prompts)| ApiSubcategory {
                    subcategory_id: format!("{}_{}", tag, name),
                    subcategory_name: name.clone(),
                    prompts: prompts.clone(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_to_internal_derives_ids_and_single_version() {
        let tree = to_internal(&api_tree(), 42);

        assert_eq!(tree.len(), 1);
        let openers = &tree[0].subcategories[0];
        assert_eq!(openers.prompts.len(), 2);

        let greeting = openers.prompts.iter().find(|p| p.title == "Greeting").unwrap();
        assert_eq!(greeting.id, "s1_Greeting");
        assert_eq!(greeting.category_id, "c1");
        assert_eq!(greeting.subcategory_id, "s1");
        assert_eq!(greeting.versions.len(), 1);
        assert_eq!(greeting.versions[0].id, "s1_Greeting_v1");
        assert_eq!(greeting.versions[0].content, "Hello");
        assert_eq!(greeting.versions[0].timestamp, 42);
        assert!(tree[0].subcategories[1].prompts.is_empty());
    }

    #[test]
    fn test_to_api_keeps_names_titles_content() {
        let tree = to_internal(&api_tree(), 1);
        let payload = to_api(&tree[0]);

        assert_eq!(payload.name, "Support");
        assert_eq!(payload.subcategories.len(), 2);
        assert_eq!(payload.subcategories["Openers"]["Greeting"], "Hello");
        assert!(payload.subcategories["Empty"].is_empty());
    }

    #[test]
    fn test_round_trip_preserves_content_but_not_ids_or_history() {
        let mut original = to_internal(&api_tree(), 100);
        // Local edit history that only lives on the client
        let prompt = &mut original[0].subcategories[0].prompts[0];
        prompt.versions.insert(
            0,
            PromptVersion {
                id: "local".into(),
                content: prompt.content.clone(),
                timestamp: 150,
                comment: Some("tweak".into()),
            },
        );

        let back = to_internal(&[served(&to_api(&original[0]), "new")], 200);

        // name / title / content survive
        assert_eq!(back[0].name, original[0].name);
        assert_eq!(back[0].subcategories.len(), original[0].subcategories.len());
        for a in &original[0].subcategories {
            let b = back[0].subcategories.iter().find(|s| s.name == a.name).unwrap();
            let mut a_pairs: Vec<_> = a.prompts.iter().map(|p| (&p.title, &p.content)).collect();
            let mut b_pairs: Vec<_> = b.prompts.iter().map(|p| (&p.title, &p.content)).collect();
            a_pairs.sort();
            b_pairs.sort();
            assert_eq!(a_pairs, b_pairs);
        }

        // ids and history do not
        let edited = &original[0].subcategories[0];
        let returned_sub = back[0].subcategories.iter().find(|s| s.name == edited.name).unwrap();
        assert_ne!(back[0].id, original[0].id);
        assert_ne!(returned_sub.id, edited.id);
        let returned = returned_sub
            .prompts
            .iter()
            .find(|p| p.title == edited.prompts[0].title)
            .unwrap();
        assert_ne!(returned.id, edited.prompts[0].id);
        assert_eq!(edited.prompts[0].versions.len(), 2);
        assert_eq!(returned.versions.len(), 1);
        assert_eq!(returned.versions[0].timestamp, 200);
        assert!(returned.versions[0].comment.is_none());
    }

    #[test]
    fn test_carry_history_keeps_matching_versions() {
        let mut previous = to_internal(&api_tree(), 100);
        let greeting = previous[0].subcategories[0]
            .prompts
            .iter_mut()
            .find(|p| p.title == "Greeting")
            .unwrap();
        greeting.content = "Hi".into();
        greeting.versions.insert(
            0,
            PromptVersion { id: "s1_Greeting_v2".into(), content: "Hi".into(), timestamp: 150, comment: None },
        );

        let mut api = api_tree();
        api[0].subcategories[0].prompts.insert("Greeting".into(), "Hi".into());
        let merged = carry_history(&previous, to_internal(&api, 300));

        let greeting = merged[0].subcategories[0].prompts.iter().find(|p| p.title == "Greeting").unwrap();
        assert_eq!(greeting.versions.len(), 2);
        assert_eq!(greeting.versions[0].content, "Hi");
        assert_eq!(greeting.versions[1].content, "Hello");

        // Unchanged prompt keeps its old single version stamp
        let farewell = merged[0].subcategories[0].prompts.iter().find(|p| p.title == "Farewell").unwrap();
        assert_eq!(farewell.versions[0].timestamp, 100);
    }

    #[test]
    fn test_carry_history_drops_diverged_content() {
        let previous = to_internal(&api_tree(), 100);
        let mut api = api_tree();
        api[0].subcategories[0].prompts.insert("Greeting".into(), "Changed elsewhere".into());

        let merged = carry_history(&previous, to_internal(&api, 300));
        let greeting = merged[0].subcategories[0].prompts.iter().find(|p| p.title == "Greeting").unwrap();
        assert_eq!(greeting.versions.len(), 1);
        assert_eq!(greeting.versions[0].timestamp, 300);
    }
}
