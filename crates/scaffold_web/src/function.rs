//! Single-function handlers and a local invocation endpoint for them.
//!
//! A `Function` maps an event object and a context object to an output
//! object. `InvokeHandler` exposes one over HTTP at the path the Lambda
//! runtime interface emulator uses, so the function can be exercised locally
//! with `curl`.

use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::{Handler, Request, Response, Router};
use crate::error::{ResponseError, WebError, bad_request};

pub const INVOKE_PATH: &str = "/2015-03-31/functions/function/invocations";

pub type Event = Map<String, Value>;
pub type Context = Map<String, Value>;
pub type Output = Map<String, Value>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FunctionError {
    #[error("event is missing required key {0:?}")]
    MissingKey(&'static str),
}

impl FunctionError {
    fn error_type(&self) -> &'static str {
        match self {
            FunctionError::MissingKey(_) => "KeyError",
        }
    }
}

impl ResponseError for FunctionError {
    fn error_response(&self) -> Response {
        Response::json(
            self.status_code(),
            serde_json::json!({
                "errorMessage": self.to_string(),
                "errorType": self.error_type(),
            }),
        )
    }
}

pub trait Function: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn invoke(&self, event: Event, context: Context) -> Result<Output, FunctionError>;
}

/// HTTP adapter: the request body is the event, the response body the output.
pub struct InvokeHandler<F: Function> {
    function: F,
}

impl<F: Function> InvokeHandler<F> {
    pub fn new(function: F) -> Self {
        Self { function }
    }

    /// Route `POST` on the invocation path to this function.
    pub fn mount(self, router: &mut Router) {
        router.post(INVOKE_PATH, Arc::new(self));
    }

    fn context(&self, req: &Request) -> Context {
        let mut context = Context::new();
        context.insert(
            "aws_request_id".to_string(),
            Value::String(req.request_id().unwrap_or_default().to_string()),
        );
        context.insert(
            "function_name".to_string(),
            Value::String(self.function.name().to_string()),
        );
        context
    }
}

#[async_trait]
impl<F: Function> Handler for InvokeHandler<F> {
    async fn handle(&self, req: Request) -> Result<Response, WebError> {
        let event = if req.body().is_empty() {
            Event::new()
        } else {
            match serde_json::from_slice::<Value>(req.body())? {
                Value::Object(event) => event,
                other => {
                    return Err(bad_request(format!(
                        "event must be a JSON object, got {}",
                        json_kind(&other)
                    )));
                }
            }
        };

        let output = self.function.invoke(event, self.context(&req))?;
        tracing::debug!(function = self.function.name(), "function invoked");
        Ok(Response::json(StatusCode::OK, output))
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
