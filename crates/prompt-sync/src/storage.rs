//! Key-value persistence for the bearer token and debug credentials.
//!
//! In the browser this is `localStorage`; tests use `MemoryStorage`.

use std::cell::RefCell;
use std::collections::HashMap;

pub const TOKEN_KEY: &str = "token";
pub const EMAIL_KEY: &str = "auth_email";
pub const PASSWORD_KEY: &str = "auth_password";

pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let storage = Self::new();
        storage.set(TOKEN_KEY, token);
        storage
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Stored token, treating an empty string as absent
pub fn stored_token(storage: &dyn KeyValueStorage) -> Option<String> {
    storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
}
