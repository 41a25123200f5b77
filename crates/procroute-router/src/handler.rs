use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ProcedureError;

/// Object-safe procedure body operating on already-validated JSON.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, input: Value) -> Result<Value, ProcedureError>;
}

/// Adapts a typed async function into a [`Handler`].
///
/// Input is decoded into `I` after schema validation; output `O` is encoded
/// back to JSON so the dispatcher can check it against the output schema.
/// Procedures without input use `I = ()`, which decodes from `null`.
pub struct FnHandler<I, O, F> {
    f: F,
    _marker: PhantomData<fn(I) -> O>,
}

impl<I, O, F> FnHandler<I, O, F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<I, O, F, Fut> Handler for FnHandler<I, O, F>
where
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, ProcedureError>> + Send,
{
    async fn call(&self, input: Value) -> Result<Value, ProcedureError> {
        let input: I = serde_json::from_value(input)
            .map_err(|err| ProcedureError::bad_request(format!("Input could not be decoded: {err}")))?;
        let output = (self.f)(input).await?;
        serde_json::to_value(output)
            .map_err(|err| ProcedureError::internal(format!("output encode failed: {err}")))
    }
}
