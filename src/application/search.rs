//! Search store: results for the current query plus persisted history.

use crate::domain::{Product, ProductPage};
use crate::infrastructure::{KeyValueStorage, StorageWriter};

/// Well-known durable-storage key for the recent-search history.
pub const RECENT_SEARCHES_STORAGE_KEY: &str = "recentSearches";

/// Number of history entries kept, most recent first.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Owns search results, the query they answer, and the recent-search
/// history. Only the history is persisted.
pub struct SearchStore {
    results: Vec<Product>,
    query: String,
    recent_searches: Vec<String>,
    is_loading: bool,
    error: Option<String>,
    writer: StorageWriter,
}

impl SearchStore {
    pub fn new(writer: StorageWriter) -> Self {
        Self {
            results: Vec::new(),
            query: String::new(),
            recent_searches: Vec::new(),
            is_loading: false,
            error: None,
            writer,
        }
    }

    /// Rehydrates the recent-search history from storage at startup.
    /// Absent or malformed history degrades to empty, never an error.
    pub fn restore_from(storage: &dyn KeyValueStorage, writer: StorageWriter) -> Self {
        let mut store = Self::new(writer);

        if let Ok(Some(json)) = storage.get(RECENT_SEARCHES_STORAGE_KEY) {
            match serde_json::from_str::<Vec<String>>(&json) {
                Ok(history) => store.recent_searches = history,
                Err(e) => {
                    tracing::warn!(error = %e, "discarding malformed search history");
                }
            }
        }

        store
    }

    pub fn results(&self) -> &[Product] {
        &self.results
    }

    /// The query the current results answer.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn recent_searches(&self) -> &[String] {
        &self.recent_searches
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Marks a search request as in flight.
    pub fn begin_search(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Applies the outcome of a search request for `query`.
    pub fn set_search_result(&mut self, query: &str, result: Result<ProductPage, String>) {
        self.is_loading = false;
        match result {
            Ok(page) => {
                self.results = page.products;
                self.query = query.to_string();
            }
            Err(message) => self.error = Some(message),
        }
    }

    /// Records `query` at the front of the history.
    ///
    /// Empty and already-present queries are ignored; the history is capped
    /// at [`MAX_RECENT_SEARCHES`] entries and persisted on every change.
    pub fn add_recent(&mut self, query: &str) {
        if query.is_empty() || self.recent_searches.iter().any(|q| q == query) {
            return;
        }

        self.recent_searches.insert(0, query.to_string());
        self.recent_searches.truncate(MAX_RECENT_SEARCHES);
        self.persist_recent();
    }

    /// Empties the history and erases its durable key.
    pub fn clear_recent(&mut self) {
        self.recent_searches.clear();
        self.writer.remove(RECENT_SEARCHES_STORAGE_KEY);
    }

    /// Drops the current results and query, keeping the history.
    pub fn clear_results(&mut self) {
        self.results.clear();
        self.query.clear();
    }

    fn persist_recent(&self) {
        match serde_json::to_string(&self.recent_searches) {
            Ok(json) => self.writer.set(RECENT_SEARCHES_STORAGE_KEY, json),
            Err(e) => tracing::error!(error = %e, "failed to serialize search history"),
        }
    }
}
