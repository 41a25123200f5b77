use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use procroute_router::{CallEnvelope, Dispatcher, ResultEnvelope};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, Result};

/// Moves one procedure call to wherever procedures run.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, procedure: &str, input: Value) -> Result<Value>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn call(&self, procedure: &str, input: Value) -> Result<Value> {
        (**self).call(procedure, input).await
    }
}

/// Calls a [`Dispatcher`] in the same process. No serialization boundary
/// beyond JSON values.
#[derive(Clone)]
pub struct LocalTransport {
    dispatcher: Dispatcher,
}

impl LocalTransport {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn call(&self, procedure: &str, input: Value) -> Result<Value> {
        self.dispatcher
            .dispatch(CallEnvelope::rpc(procedure, input))
            .await
            .envelope
            .into_result()
            .map_err(ClientError::Remote)
    }
}

/// Settings for [`HttpTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransportConfig {
    /// Server origin, e.g. `http://127.0.0.1:3000`.
    pub base_url: String,
    pub rpc_path: String,
    pub timeout: Duration,
    /// Sent as `Authorization: Bearer …` when set.
    pub token: Option<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            rpc_path: "/api/rpc".to_string(),
            timeout: Duration::from_secs(30),
            token: None,
        }
    }
}

impl HttpTransportConfig {
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.rpc_path.trim_start_matches('/')
        )
    }
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    procedure: &'a str,
    input: Value,
}

/// POSTs envelopes to a server's RPC endpoint.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint(),
            timeout: config.timeout,
            token: config.token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout)
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, procedure: &str, input: Value) -> Result<Value> {
        tracing::debug!(procedure, endpoint = %self.endpoint, "rpc call");

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&RpcRequest { procedure, input });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|err| self.map_error(err))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|err| self.map_error(err))?;

        // Error statuses still carry an envelope; anything else is a broken peer.
        let envelope: ResultEnvelope = serde_json::from_slice(&body).map_err(|_| {
            let body = String::from_utf8_lossy(&body).chars().take(256).collect();
            ClientError::InvalidResponse { status, body }
        })?;

        envelope.into_result().map_err(ClientError::Remote)
    }
}
