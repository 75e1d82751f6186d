//! Prompt tree state with optimistic synchronization against the remote
//! prompt service.

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod mapper;
pub mod models;
pub mod overlay;
pub mod storage;
pub mod store;
pub mod sync;
pub mod tree;

pub use api::{HttpPromptService, PromptService};
pub use auth::{AuthDebugState, AuthDebugger, CredentialProvider, HttpCredentialProvider, TokenStatus};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ApiConfig;
pub use error::{ApiError, SyncError};
pub use models::{Category, NewPrompt, Prompt, PromptVersion, Subcategory};
pub use overlay::PendingOp;
pub use storage::{KeyValueStorage, MemoryStorage};
pub use store::{Notice, NoticeVariant, StateHandle, TreeState};
pub use sync::PromptManager;
pub use tree::TreeRow;
