use http::StatusCode;
use serde_json::{json, Value};
use tracing::{error, warn};

/// Where handlers write their response.
pub trait Output {
    fn write(&mut self, payload: Value, status: StatusCode);

    fn error(&mut self, message: &str, status: StatusCode) {
        self.write(json!({ "error": message }), status)
    }

    fn message(&mut self, message: &str, status: StatusCode) {
        self.write(json!({ "message": message }), status)
    }

    fn ok(&mut self, payload: Value) {
        self.write(payload, StatusCode::OK)
    }

    fn fail(&mut self, message: &str) {
        self.error(message, StatusCode::BAD_REQUEST)
    }
}

/// Collects a single response. The first write sticks; later writes are
/// dropped with a warning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    written: Option<(StatusCode, Value)>,
}

impl Reply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_written(&self) -> bool {
        self.written.is_some()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.written.as_ref().map(|(s, _)| *s)
    }

    pub fn body(&self) -> Option<&Value> {
        self.written.as_ref().map(|(_, b)| b)
    }

    pub fn into_parts(self) -> Option<(StatusCode, Value)> {
        self.written
    }
}

impl Output for Reply {
    fn write(&mut self, payload: Value, status: StatusCode) {
        match self.written {
            Some((first, _)) => warn!(
                first = first.as_u16(),
                dropped = status.as_u16(),
                "response already written"
            ),
            None => self.written = Some((status, payload)),
        }
    }
}

/// Receives routing failures and anything else a caller reports through
/// [`Dispatcher::error`](crate::Dispatcher::error).
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, message: &str, status: StatusCode, out: &mut dyn Output);
}

impl<F> ErrorHandler for F
where
    F: Fn(&str, StatusCode, &mut dyn Output) + Send + Sync,
{
    fn handle(&self, message: &str, status: StatusCode, out: &mut dyn Output) {
        (self)(message, status, out)
    }
}

/// The default: logs and writes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogError;

impl ErrorHandler for LogError {
    fn handle(&self, message: &str, status: StatusCode, _: &mut dyn Output) {
        error!(
            status = status.as_u16(),
            "error handler was not configured: {}", message
        );
    }
}

/// Writes `{"error": message}` with the given status.
#[derive(Debug, Clone, Copy, Default)]
pub struct RespondWithError;

impl ErrorHandler for RespondWithError {
    fn handle(&self, message: &str, status: StatusCode, out: &mut dyn Output) {
        out.error(message, status)
    }
}
