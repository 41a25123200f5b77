//! Typed client for the service's procedures.

use procroute_client::{
    Client, ClientError, HttpTransport, HttpTransportConfig, LocalTransport, Result, Transport,
};
use procroute_router::Dispatcher;

use crate::procedures::{
    divide, greet, hello, time, todos, DivideInput, DivideOutput, GreetInput, GreetOutput,
    HelloOutput, TimeOutput, Todo,
};

/// One method per procedure. Reads (`hello`, `get_todos`) go through
/// [`Client::query`] and are cached when the client has a cache attached;
/// everything else is called directly.
#[derive(Clone)]
pub struct ApiClient<T> {
    client: Client<T>,
}

impl ApiClient<LocalTransport> {
    /// In-process client over `dispatcher`.
    pub fn local(dispatcher: Dispatcher) -> Self {
        Self::new(Client::new(LocalTransport::new(dispatcher)))
    }
}

impl ApiClient<HttpTransport> {
    /// Client for a server reachable over HTTP.
    pub fn http(config: HttpTransportConfig) -> std::result::Result<Self, ClientError> {
        Ok(Self::new(Client::new(HttpTransport::new(config)?)))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(client: Client<T>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client<T> {
        &self.client
    }

    pub async fn hello(&self) -> Result<HelloOutput> {
        self.client.query(hello::NAME, &()).await
    }

    pub async fn greet(&self, name: impl Into<String>) -> Result<GreetOutput> {
        let input = GreetInput { name: name.into() };
        self.client.call(greet::NAME, &input).await
    }

    pub async fn divide(&self, a: f64, b: f64) -> Result<DivideOutput> {
        self.client.call(divide::NAME, &DivideInput { a, b }).await
    }

    pub async fn get_todos(&self) -> Result<Vec<Todo>> {
        self.client.query(todos::NAME, &()).await
    }

    pub async fn get_current_time(&self) -> Result<TimeOutput> {
        self.client.call(time::NAME, &()).await
    }
}
