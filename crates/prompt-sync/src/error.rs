//! Error types for the remote layer and the mutation protocol.

use thiserror::Error;

/// Failures talking to the prompt service or the login endpoint
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Authentication token not found")]
    MissingToken,
    /// Non-2xx response
    #[error("{message}")]
    Http { status: u16, message: String },
    /// 2xx response whose body reports an error status
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build the error for a non-2xx response from its raw body.
    ///
    /// Prefers the body's `message`, then a FastAPI `detail` string, then a
    /// generic status line.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["message", "detail"]
                    .iter()
                    .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
            })
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));
        ApiError::Http { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } | ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Failures of a store mutation; rendered into `TreeState::error`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    #[error("Category with ID {0} not found")]
    CategoryNotFound(String),
    #[error("Subcategory with ID {0} not found")]
    SubcategoryNotFound(String),
    #[error("Prompt with ID {0} not found")]
    PromptNotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{kind} \"{name}\" already exists")]
    DuplicateName { kind: &'static str, name: String },
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_body() {
        let err = ApiError::from_response(400, r#"{"message": "bad category"}"#);
        assert_eq!(err.to_string(), "bad category");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_detail_from_fastapi_body() {
        let err = ApiError::from_response(500, r#"{"detail": "Failed to process prompt category: boom"}"#);
        assert_eq!(err.to_string(), "Failed to process prompt category: boom");
    }

    #[test]
    fn test_generic_message_for_unparseable_body() {
        assert_eq!(ApiError::from_response(502, "<html>").to_string(), "HTTP error! status: 502");
        assert_eq!(ApiError::from_response(404, "{}").to_string(), "HTTP error! status: 404");
        assert_eq!(ApiError::from_response(401, r#"{"detail": {"loc": []}}"#).to_string(), "HTTP error! status: 401");
    }

    #[test]
    fn test_sync_error_messages() {
        assert_eq!(SyncError::CategoryNotFound("c9".into()).to_string(), "Category with ID c9 not found");
        assert_eq!(
            SyncError::DuplicateName { kind: "Prompt", name: "Greeting".into() }.to_string(),
            "Prompt \"Greeting\" already exists"
        );
        assert_eq!(SyncError::from(ApiError::MissingToken).to_string(), "Authentication token not found");
    }
}
