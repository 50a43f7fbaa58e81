//! Function that echoes the event's `msg`, plus a local invocation endpoint.

use scaffold_web::function::{Context, Event, Function, FunctionError, InvokeHandler, Output};
use scaffold_web::{App, PanicRecoveryMiddleware, Router, TracingMiddleware};
use serde_json::Value;

pub const DEFAULT_PORT: u16 = 8080;

/// Return `{"echo": <msg>}`. A string `msg` is copied as is; any other JSON
/// value is echoed in its JSON text form, so `true` and `null` come back as
/// `"true"` and `"null"` rather than a Python-style `"True"` or `"None"`.
pub fn echo(event: &Event, _context: &Context) -> Result<Output, FunctionError> {
    let msg = event.get("msg").ok_or(FunctionError::MissingKey("msg"))?;
    let echoed = match msg {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let mut output = Output::new();
    output.insert("echo".to_string(), Value::String(echoed));
    Ok(output)
}

pub struct Echo;

impl Function for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn invoke(&self, event: Event, context: Context) -> Result<Output, FunctionError> {
        echo(&event, &context)
    }
}

pub fn app() -> App {
    let mut router = Router::new();
    InvokeHandler::new(Echo).mount(&mut router);

    let mut app = App::new(router);
    app.use_middleware(TracingMiddleware::new());
    app.use_middleware(PanicRecoveryMiddleware::new());
    app
}
