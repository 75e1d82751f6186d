//! Prompt Models
//!
//! Internal tree entities and the wire shapes exchanged with the prompt service.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

// ========================
// Internal Tree
// ========================

/// One recorded state of a prompt's content, newest first in `Prompt::versions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptVersion {
    pub id: String,
    pub content: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category_id: String,
    pub subcategory_id: String,
    pub versions: Vec<PromptVersion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: String,
    pub name: String,
    pub prompts: Vec<Prompt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub subcategories: Vec<Subcategory>,
}

/// Form input for a new prompt
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewPrompt {
    pub title: String,
    pub content: String,
}

impl Prompt {
    /// Id the service-side key maps to once loaded: `{subcategory_id}_{title}`
    pub fn derived_id(subcategory_id: &str, title: &str) -> String {
        format!("{}_{}", subcategory_id, title)
    }

    pub fn version_id(prompt_id: &str, number: usize) -> String {
        format!("{}_v{}", prompt_id, number)
    }
}

// ========================
// Wire Shapes
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSubcategory {
    pub subcategory_id: String,
    pub subcategory_name: String,
    /// title -> content
    #[serde(default, deserialize_with = "lenient_prompts")]
    pub prompts: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCategory {
    pub category_id: String,
    pub category_name: String,
    #[serde(default)]
    pub subcategories: Vec<ApiSubcategory>,
}

/// Body of the list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PromptsResponse {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<ApiCategory>>,
}

/// Full replacement of one category, keyed by names and titles only
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    pub subcategories: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletePromptRequest<'a> {
    pub category_id: &'a str,
    pub subcategory_id: &'a str,
    pub prompt_key: &'a str,
}

/// Acknowledgement returned by mutating endpoints.
///
/// The service sometimes answers HTTP 200 with an error status in the body,
/// so `status` is inspected by the client.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ApiAck {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
}

/// Missing, null or non-object `prompts` become empty; non-string values are dropped
fn lenient_prompts<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let prompts = match value {
        Some(serde_json::Value::Object(map)) => map
            .into_iter()
            .filter_map(|(title, content)| match content {
                serde_json::Value::String(text) => Some((title, text)),
                _ => None,
            })
            .collect(),
        _ => BTreeMap::new(),
    };
    Ok(prompts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcategory_prompts_tolerate_garbage() {
        let json = r#"[
            {"subcategory_id": "s1", "subcategory_name": "A", "prompts": null},
            {"subcategory_id": "s2", "subcategory_name": "B"},
            {"subcategory_id": "s3", "subcategory_name": "C", "prompts": ["x"]},
            {"subcategory_id": "s4", "subcategory_name": "D", "prompts": {"ok": "yes", "bad": 3}}
        ]"#;
        let subs: Vec<ApiSubcategory> = serde_json::from_str(json).unwrap();

        assert!(subs[0].prompts.is_empty());
        assert!(subs[1].prompts.is_empty());
        assert!(subs[2].prompts.is_empty());
        assert_eq!(subs[3].prompts.len(), 1);
        assert_eq!(subs[3].prompts["ok"], "yes");
    }

    #[test]
    fn test_delete_prompt_request_field_names() {
        let body = DeletePromptRequest {
            category_id: "c1",
            subcategory_id: "s1",
            prompt_key: "Greeting",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"category_id": "c1", "subcategory_id": "s1", "prompt_key": "Greeting"})
        );
    }

    #[test]
    fn test_prompts_response_without_data() {
        let resp: PromptsResponse =
            serde_json::from_str(r#"{"status": 503, "message": "Database service unavailable"}"#).unwrap();
        assert_eq!(resp.status, Some(503));
        assert!(resp.data.is_none());
    }
}
