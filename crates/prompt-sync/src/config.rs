//! Service Endpoint Configuration

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Base URL and endpoint paths of the prompt service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub prompts_path: String,
    pub create_prompt_path: String,
    pub delete_prompt_path: String,
    pub delete_category_path: String,
    pub delete_subcategory_path: String,
    pub login_path: String,
    /// Lightweight authenticated endpoint used to probe a token
    pub token_check_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            prompts_path: "/retrieve_prompts".to_string(),
            create_prompt_path: "/create_prompt".to_string(),
            delete_prompt_path: "/delete_prompt".to_string(),
            delete_category_path: "/delete_category".to_string(),
            delete_subcategory_path: "/delete_subcategory".to_string(),
            login_path: "/login".to_string(),
            token_check_path: "/categories".to_string(),
        }
    }
}

impl ApiConfig {
    /// Defaults, with the base URL baked in at build time from
    /// `PROMPT_CONSOLE_API_URL` when set (wasm has no runtime environment).
    pub fn from_env() -> Self {
        match option_env!("PROMPT_CONSOLE_API_URL") {
            Some(url) if !url.trim().is_empty() => Self::default().with_base_url(url),
            _ => Self::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim().to_string();
        self
    }

    /// Parse a JSON config document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Join the base URL and a path with exactly one slash between them
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    pub fn prompts_url(&self) -> String {
        self.url(&self.prompts_path)
    }

    pub fn create_prompt_url(&self) -> String {
        self.url(&self.create_prompt_path)
    }

    pub fn delete_prompt_url(&self) -> String {
        self.url(&self.delete_prompt_path)
    }

    pub fn delete_category_url(&self) -> String {
        self.url(&self.delete_category_path)
    }

    pub fn delete_subcategory_url(&self) -> String {
        self.url(&self.delete_subcategory_path)
    }

    pub fn login_url(&self) -> String {
        self.url(&self.login_path)
    }

    pub fn token_check_url(&self) -> String {
        self.url(&self.token_check_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let config = ApiConfig::default().with_base_url("https://api.example.com/v1/");
        assert_eq!(config.prompts_url(), "https://api.example.com/v1/retrieve_prompts");
        assert_eq!(config.url("login"), "https://api.example.com/v1/login");
        assert_eq!(config.delete_category_url(), "https://api.example.com/v1/delete_category");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ApiConfig::from_json(r#"{"base_url": "http://prompts.internal", "login_path": "/auth/login"}"#).unwrap();
        assert_eq!(config.base_url, "http://prompts.internal");
        assert_eq!(config.login_url(), "http://prompts.internal/auth/login");
        assert_eq!(config.create_prompt_path, "/create_prompt");
    }
}
