use crate::error::{CodebinError, Result};
use crate::models::Snippet;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Storage backend for saved snippets.
///
/// Snippets are immutable once saved: there is save and get, nothing else.
pub trait SnippetStore: Send + Sync {
    fn save(&self, snippet: &Snippet) -> Result<()>;
    fn get(&self, id: &str) -> Result<Snippet>;
}

pub type SharedStore = Arc<dyn SnippetStore>;

/// In-memory snippet store keyed by snippet id.
pub struct MemoryStore {
    snippets: Mutex<HashMap<String, Snippet>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            snippets: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl SnippetStore for MemoryStore {
    fn save(&self, snippet: &Snippet) -> Result<()> {
        let mut snippets = self
            .snippets
            .lock()
            .map_err(|_| CodebinError::Other("snippet store lock poisoned".to_string()))?;
        snippets.insert(snippet.id.clone(), snippet.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Snippet> {
        let snippets = self
            .snippets
            .lock()
            .map_err(|_| CodebinError::Other("snippet store lock poisoned".to_string()))?;
        snippets
            .get(id)
            .cloned()
            .ok_or_else(|| CodebinError::SnippetNotFound(id.to_string()))
    }
}
