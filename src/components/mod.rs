//! UI Components
//!
//! Leptos components for the prompt console.

mod auth_debug;
mod category_tree;
mod delete_confirm_button;
mod header;
mod name_form;
mod notice_stack;
mod prompt_editor;
mod prompt_list;

pub use auth_debug::AuthDebug;
pub use category_tree::CategoryTree;
pub use delete_confirm_button::DeleteConfirmButton;
pub use header::Header;
pub use name_form::NameForm;
pub use notice_stack::NoticeStack;
pub use prompt_editor::PromptEditor;
pub use prompt_list::PromptList;
