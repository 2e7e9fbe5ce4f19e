//! Shared search query.

use std::sync::{Arc, PoisonError, RwLock};

/// One search string shared by every view that holds a clone of the handle.
///
/// Pass the same instance to every consumer; a freshly constructed instance
/// is isolated from all others.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    inner: Arc<RwLock<String>>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> String {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, query: impl Into<String>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = query.into();
    }

    pub fn clear(&self) {
        self.set(String::new());
    }

    /// Case-insensitive containment test against the current query.
    /// An empty query matches everything.
    pub fn matches<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        let query = self.get();
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        fields
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}
