use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProcedureError;
use crate::method::Method;

/// Raw input as received by a transport, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Already-typed JSON (RPC bodies). Validated strictly.
    Structured(Value),
    /// String parameters from the path or query string, plus an optional
    /// JSON body. Parameters are coerced against the input schema, then
    /// merged with the body.
    Params {
        params: Map<String, Value>,
        body: Option<Value>,
    },
}

/// One call against the registry, addressed by procedure name.
#[derive(Debug, Clone, PartialEq)]
pub struct CallEnvelope {
    pub procedure: String,
    pub input: RawInput,
}

impl CallEnvelope {
    /// RPC-style call with structured input.
    pub fn rpc(procedure: impl Into<String>, input: Value) -> Self {
        Self {
            procedure: procedure.into(),
            input: RawInput::Structured(input),
        }
    }
}

/// One REST request, addressed by method and path.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCall {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RouteCall {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Outcome of a call as seen by clients: `{"ok":true,"value":…}` or
/// `{"ok":false,"error":{…}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProcedureError>,
}

impl ResultEnvelope {
    pub fn success(value: Value) -> Self {
        Self {
            ok: true,
            value: Some(value),
            error: None,
        }
    }

    pub fn failure(error: ProcedureError) -> Self {
        Self {
            ok: false,
            value: None,
            error: Some(error),
        }
    }

    /// Convert into a `Result`. A failure without an error object is treated
    /// as an internal error; a success without a value yields `null`.
    pub fn into_result(self) -> Result<Value, ProcedureError> {
        if self.ok {
            Ok(self.value.unwrap_or(Value::Null))
        } else {
            Err(self
                .error
                .unwrap_or_else(|| ProcedureError::internal("error envelope without error")))
        }
    }
}

/// A finished dispatch: envelope plus the transport status it maps to.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub status: u16,
    pub envelope: ResultEnvelope,
}

impl Dispatched {
    pub fn success(value: Value) -> Self {
        Self {
            status: 200,
            envelope: ResultEnvelope::success(value),
        }
    }

    pub fn failure(error: ProcedureError) -> Self {
        Self {
            status: error.http_status(),
            envelope: ResultEnvelope::failure(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.envelope.ok
    }

    /// REST body: the bare value on success, the error object on failure.
    pub fn rest_body(&self) -> Value {
        match (&self.envelope.value, &self.envelope.error) {
            (Some(value), _) if self.envelope.ok => value.clone(),
            (_, Some(error)) => serde_json::to_value(error).unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_wire_shape() {
        let ok = ResultEnvelope::success(json!({"result": 2.0}));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"ok": true, "value": {"result": 2.0}})
        );

        let failed = ResultEnvelope::failure(ProcedureError::not_found("nope"));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"ok": false, "error": {"code": "NOT_FOUND", "message": "nope"}})
        );
    }

    #[test]
    fn envelope_decodes_into_result() {
        let decoded: ResultEnvelope =
            serde_json::from_value(json!({"ok": false, "error": {"code": "BAD_REQUEST", "message": "x"}}))
                .unwrap();
        assert_eq!(decoded.into_result().unwrap_err().message, "x");

        let decoded: ResultEnvelope = serde_json::from_value(json!({"ok": true})).unwrap();
        assert_eq!(decoded.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn rest_body_unwraps_value() {
        let dispatched = Dispatched::success(json!([1, 2]));
        assert_eq!(dispatched.rest_body(), json!([1, 2]));

        let dispatched = Dispatched::failure(ProcedureError::bad_request("bad"));
        assert_eq!(dispatched.status, 400);
        assert_eq!(dispatched.rest_body()["code"], json!("BAD_REQUEST"));
    }
}
