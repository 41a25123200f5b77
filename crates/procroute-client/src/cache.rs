use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, OnceCell};

use crate::error::Result;

type QueryKey = (String, String);

/// Result cache for read procedures, keyed by procedure name and the
/// serialized input.
///
/// Concurrent lookups of the same key share one in-flight fetch. Only
/// successful results are stored; a failed fetch removes its key and the
/// next caller fetches again.
#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, Arc<OnceCell<Value>>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `(procedure, input)`, or run `fetch` and
    /// cache its result.
    pub async fn get_or_fetch<F, Fut>(&self, procedure: &str, input: &Value, fetch: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        let key = key(procedure, input);
        let cell = {
            let mut entries = self.entries.lock().await;
            entries.entry(key.clone()).or_default().clone()
        };

        match cell.get_or_try_init(fetch).await {
            Ok(value) => Ok(value.clone()),
            Err(err) => {
                let mut entries = self.entries.lock().await;
                if entries
                    .get(&key)
                    .is_some_and(|current| Arc::ptr_eq(current, &cell) && !current.initialized())
                {
                    entries.remove(&key);
                }
                Err(err)
            }
        }
    }

    /// Cached value, if present. Never fetches.
    pub async fn get(&self, procedure: &str, input: &Value) -> Option<Value> {
        let entries = self.entries.lock().await;
        entries
            .get(&key(procedure, input))
            .and_then(|cell| cell.get().cloned())
    }

    /// Drop every entry for `procedure` (and for procedures nested under it,
    /// e.g. `todos` also drops `todos.list`). Returns the number removed.
    pub async fn invalidate(&self, procedure: &str) -> usize {
        let nested = format!("{procedure}.");
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|(name, _), _| name != procedure && !name.starts_with(&nested));
        before - entries.len()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Number of stored results.
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn key(procedure: &str, input: &Value) -> QueryKey {
    (procedure.to_string(), input.to_string())
}
