use std::sync::Arc;

use crate::error::AppResult;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// String-keyed persisted state store
///
/// The watched-state component is handed one of these at construction
/// instead of reaching for ambient global state, so tests can inject an
/// in-memory fake. Values survive process restarts when the backing
/// implementation is durable.
pub trait StateStore: Send + Sync {
    /// Returns the stored value for `key`, if any
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Removes `key`, returning it to its unset state
    fn remove(&self, key: &str) -> AppResult<()>;
}

impl<S: StateStore + ?Sized> StateStore for Arc<S> {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        (**self).remove(key)
    }
}
