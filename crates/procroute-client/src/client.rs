use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::cache::QueryCache;
use crate::error::{ClientError, Result};
use crate::transport::Transport;

/// Typed procedure caller over any [`Transport`].
#[derive(Clone)]
pub struct Client<T> {
    transport: T,
    cache: Option<Arc<QueryCache>>,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cache: None,
        }
    }

    /// Route [`Client::query`] calls through `cache`.
    pub fn with_cache(mut self, cache: Arc<QueryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> Option<&Arc<QueryCache>> {
        self.cache.as_ref()
    }

    /// Call `procedure` with typed input and decode typed output. Never cached.
    pub async fn call<I, O>(&self, procedure: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let input = serde_json::to_value(input).map_err(ClientError::Encode)?;
        let output = self.transport.call(procedure, input).await?;
        serde_json::from_value(output).map_err(ClientError::Decode)
    }

    /// Like [`Client::call`], but served from the cache when one is attached.
    pub async fn query<I, O>(&self, procedure: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let input = serde_json::to_value(input).map_err(ClientError::Encode)?;
        let output = match &self.cache {
            Some(cache) => {
                cache
                    .get_or_fetch(procedure, &input, || {
                        self.transport.call(procedure, input.clone())
                    })
                    .await?
            }
            None => self.transport.call(procedure, input).await?,
        };
        serde_json::from_value(output).map_err(ClientError::Decode)
    }

    /// Untyped call.
    pub async fn call_value(&self, procedure: &str, input: Value) -> Result<Value> {
        self.transport.call(procedure, input).await
    }

    /// Drop cached results for `procedure`. No-op without a cache.
    pub async fn invalidate(&self, procedure: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(procedure).await;
        }
    }
}
