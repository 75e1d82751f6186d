//! Remote Prompt Service
//!
//! The service is category-granular: every change below the category level
//! is sent as a full replacement of the owning category.

use std::rc::Rc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{ApiAck, ApiCategory, CategoryPayload, DeletePromptRequest, PromptsResponse};
use crate::storage::{stored_token, KeyValueStorage};

#[async_trait(?Send)]
pub trait PromptService {
    async fn list_categories(&self) -> Result<Vec<ApiCategory>, ApiError>;

    /// Create, or replace by name, one category with its subcategories and prompts
    async fn create_category(&self, payload: &CategoryPayload) -> Result<ApiAck, ApiError>;

    async fn delete_prompt(
        &self,
        category_id: &str,
        subcategory_id: &str,
        prompt_key: &str,
    ) -> Result<ApiAck, ApiError>;

    async fn delete_category(&self, category_id: &str) -> Result<ApiAck, ApiError>;

    async fn delete_subcategory(&self, category_id: &str, subcategory_id: &str) -> Result<ApiAck, ApiError>;
}

/// Bearer-authenticated HTTP client for the prompt service
#[derive(Clone)]
pub struct HttpPromptService {
    client: Client,
    config: ApiConfig,
    storage: Rc<dyn KeyValueStorage>,
}

impl HttpPromptService {
    pub fn new(config: ApiConfig, storage: Rc<dyn KeyValueStorage>) -> Self {
        Self { client: Client::new(), config, storage }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Token lookup happens before any request is built
    fn token(&self) -> Result<String, ApiError> {
        stored_token(self.storage.as_ref()).ok_or(ApiError::MissingToken)
    }
}

#[async_trait(?Send)]
impl PromptService for HttpPromptService {
    async fn list_categories(&self) -> Result<Vec<ApiCategory>, ApiError> {
        let token = self.token()?;
        let url = self.config.prompts_url();
        debug!(%url, "fetching prompt categories");
        let body = send(self.client.get(&url).bearer_auth(token)).await?;
        parse_list(&body)
    }

    async fn create_category(&self, payload: &CategoryPayload) -> Result<ApiAck, ApiError> {
        let token = self.token()?;
        let url = self.config.create_prompt_url();
        debug!(%url, category = %payload.name, subcategories = payload.subcategories.len(), "replacing category");
        let body = send(self.client.post(&url).bearer_auth(token).json(payload)).await?;
        parse_ack(&body)
    }

    async fn delete_prompt(
        &self,
        category_id: &str,
        subcategory_id: &str,
        prompt_key: &str,
    ) -> Result<ApiAck, ApiError> {
        let token = self.token()?;
        let url = self.config.delete_prompt_url();
        debug!(%url, category_id, subcategory_id, prompt_key, "deleting prompt");
        let request = DeletePromptRequest { category_id, subcategory_id, prompt_key };
        let body = send(self.client.delete(&url).bearer_auth(token).json(&request)).await?;
        parse_ack(&body)
    }

    async fn delete_category(&self, category_id: &str) -> Result<ApiAck, ApiError> {
        let token = self.token()?;
        let url = self.config.delete_category_url();
        debug!(%url, category_id, "deleting category");
        let request = self
            .client
            .delete(&url)
            .bearer_auth(token)
            .query(&[("category_id", category_id)]);
        parse_ack(&send(request).await?)
    }

    async fn delete_subcategory(&self, category_id: &str, subcategory_id: &str) -> Result<ApiAck, ApiError> {
        let token = self.token()?;
        let url = self.config.delete_subcategory_url();
        debug!(%url, category_id, subcategory_id, "deleting subcategory");
        let request = self
            .client
            .delete(&url)
            .bearer_auth(token)
            .query(&[("category_id", category_id), ("subcategory_id", subcategory_id)]);
        parse_ack(&send(request).await?)
    }
}

/// Send and return the raw body of a 2xx response
pub(crate) async fn send(request: RequestBuilder) -> Result<String, ApiError> {
    let response = request.send().await.map_err(|e| {
        warn!(error = %e, "request failed to send");
        ApiError::from(e)
    })?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        let err = ApiError::from_response(status.as_u16(), &body);
        warn!(status = status.as_u16(), error = %err, "service returned an error");
        return Err(err);
    }
    Ok(body)
}

/// Turn an in-body error status into a failure
fn reject_status(status: Option<u16>, message: Option<String>) -> Result<(), ApiError> {
    match status {
        Some(status) if status >= 400 => Err(ApiError::Rejected {
            status,
            message: message.unwrap_or_else(|| format!("Request failed with status {}", status)),
        }),
        _ => Ok(()),
    }
}

pub fn parse_list(body: &str) -> Result<Vec<ApiCategory>, ApiError> {
    let response: PromptsResponse =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    reject_status(response.status, response.message)?;
    Ok(response.data.unwrap_or_default())
}

pub fn parse_ack(body: &str) -> Result<ApiAck, ApiError> {
    if body.trim().is_empty() {
        return Ok(ApiAck::default());
    }
    let ack: ApiAck = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    reject_status(ack.status, ack.message.clone())?;
    Ok(ack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_parse_list() {
        let body = r#"{"status": 200, "data": [
            {"category_name": "Support", "category_id": "category_1", "subcategories": [
                {"subcategory_name": "Openers", "subcategory_id": "subcategory_1_Openers", "prompts": {"Greeting": "Hello"}}
            ]}
        ]}"#;
        let categories = parse_list(body).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].subcategories[0].prompts["Greeting"], "Hello");
    }

    #[test]
    fn test_parse_list_missing_data_is_empty() {
        assert!(parse_list(r#"{"status": 200}"#).unwrap().is_empty());
    }

    #[test]
    fn test_in_body_error_status_is_rejected() {
        let err = parse_list(r#"{"status": 503, "message": "Database service unavailable"}"#).unwrap_err();
        assert_eq!(err, ApiError::Rejected { status: 503, message: "Database service unavailable".into() });

        let err = parse_ack(r#"{"status": 404, "message": "Prompt with key 'x' not found"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Prompt with key 'x' not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_parse_ack() {
        let ack = parse_ack(r#"{"status": 200, "message": "ok", "category_id": "category_9"}"#).unwrap();
        assert_eq!(ack.category_id.as_deref(), Some("category_9"));
        assert_eq!(parse_ack("").unwrap(), ApiAck::default());
        assert!(matches!(parse_ack("not json"), Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_request() {
        // Unroutable base URL: reaching the network would surface a transport error instead
        let service = HttpPromptService::new(
            ApiConfig::default().with_base_url("http://127.0.0.1:9"),
            Rc::new(MemoryStorage::new()),
        );
        assert_eq!(service.list_categories().await.unwrap_err(), ApiError::MissingToken);
        assert_eq!(
            service.create_category(&CategoryPayload::default()).await.unwrap_err(),
            ApiError::MissingToken
        );
        assert_eq!(service.delete_category("c1").await.unwrap_err(), ApiError::MissingToken);
    }
}
