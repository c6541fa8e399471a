use super::{BoxFuture, Request, Response};
use crate::dispatch::{Dispatcher, Output, Reply};

use std::convert::Infallible;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::task::{Context, Poll};

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, StatusCode};
use hyper::service::Service;
use hyper::Body;
use serde_json::{json, Value};
use tracing::{error, warn};

/// Serves a [`Dispatcher`] over hyper.
///
/// The body is buffered and decoded as JSON (`{}` when empty or invalid),
/// the `Authorization` header becomes the token, and whatever the handler
/// writes becomes a JSON response. A panicking handler yields a 500.
///
/// When the dispatcher's error handler writes nothing (the default
/// [`LogError`](crate::LogError)), an unmatched route still answers 404
/// `{"error": "The route <path> was not found."}` and a handler that wrote
/// nothing answers 500 `{"error": "No response was produced."}`.
#[derive(Debug, Clone)]
pub struct RouterService {
    dispatcher: Arc<Dispatcher>,
}

impl RouterService {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::from_shared(Arc::new(dispatcher))
    }

    pub fn from_shared(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Runs one request to completion.
    pub async fn handle(&self, req: Request) -> Result<Response, hyper::Error> {
        let (parts, body) = req.into_parts();
        let bytes = hyper::body::to_bytes(body).await?;
        let data = decode_body(&bytes);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let mut reply = Reply::new();
        let routed = panic::catch_unwind(AssertUnwindSafe(|| {
            self.dispatcher.process(
                parts.method.as_str(),
                parts.uri.path(),
                parts.uri.query(),
                data,
                token,
                &mut reply,
            )
        }));

        match routed {
            Err(_) => {
                error!(method = %parts.method, path = parts.uri.path(), "handler panicked");
                reply = Reply::new();
                reply.error("Internal server error", StatusCode::INTERNAL_SERVER_ERROR);
            }
            Ok(false) if !reply.is_written() => {
                let message = format!("The route {} was not found.", parts.uri.path());
                reply.error(&message, StatusCode::NOT_FOUND);
            }
            Ok(_) => {}
        }

        let (status, payload) = reply.into_parts().unwrap_or_else(|| {
            warn!(method = %parts.method, path = parts.uri.path(), "no response was produced");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "No response was produced." }),
            )
        });

        Ok(json_response(status, &payload))
    }
}

impl Service<Request> for RouterService {
    type Response = Response;
    type Error = hyper::Error;
    type Future = BoxFuture<'static, Result<Response, hyper::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { service.handle(req).await })
    }
}

impl<T> Service<&T> for RouterService {
    type Response = RouterService;
    type Error = Infallible;
    type Future = std::future::Ready<Result<RouterService, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _: &T) -> Self::Future {
        std::future::ready(Ok(self.clone()))
    }
}

fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return json!({});
    }
    match serde_json::from_slice(bytes) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "invalid JSON body, using an empty object");
            json!({})
        }
    }
}

fn json_response(status: StatusCode, payload: &Value) -> Response {
    let mut res = Response::new(Body::from(payload.to_string()));
    *res.status_mut() = status;
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    res
}
