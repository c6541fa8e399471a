use super::args::RequestArgs;
use super::handler::{BoxHandler, Handler};
use super::output::{ErrorHandler, LogError, Output};
use crate::http_router::{parse_method, HttpRouter, Method};
use crate::router::{MatchOptions, RouterError};

use std::sync::{Arc, RwLock};

use http::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

/// Owns the route table and turns one request into one handler call.
pub struct Dispatcher {
    router: HttpRouter<BoxHandler>,
    on_error: SharedErrorHandler,
}

/// The error handler slot, shared with the handlers that report through it.
/// Replacing the handler also affects routes registered before the change.
#[derive(Clone)]
pub(crate) struct SharedErrorHandler {
    slot: Arc<RwLock<Arc<dyn ErrorHandler>>>,
}

impl SharedErrorHandler {
    fn new(handler: Arc<dyn ErrorHandler>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(handler)),
        }
    }

    fn replace(&self, handler: Arc<dyn ErrorHandler>) {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = handler;
    }

    pub(crate) fn handle(&self, message: &str, status: StatusCode, out: &mut dyn Output) {
        let handler = Arc::clone(&*self.slot.read().unwrap_or_else(|e| e.into_inner()));
        handler.handle(message, status, out)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("options", &self.router.options())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::from_router(HttpRouter::new())
    }

    pub fn with_options(options: MatchOptions) -> Self {
        Self::from_router(HttpRouter::with_options(options))
    }

    pub fn from_router(router: HttpRouter<BoxHandler>) -> Self {
        Self {
            router,
            on_error: SharedErrorHandler::new(Arc::new(LogError)),
        }
    }

    pub fn router(&self) -> &HttpRouter<BoxHandler> {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut HttpRouter<BoxHandler> {
        &mut self.router
    }

    pub fn set_error_handler(&mut self, handler: impl ErrorHandler + 'static) -> &mut Self {
        self.on_error.replace(Arc::new(handler));
        self
    }

    pub fn on_error<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&str, StatusCode, &mut dyn Output) + Send + Sync + 'static,
    {
        self.set_error_handler(f)
    }

    /// Reports an error through the configured error handler.
    pub fn error(&self, message: &str, status: StatusCode, out: &mut dyn Output) {
        self.on_error.handle(message, status, out)
    }

    pub fn route<F>(&mut self, verb: &str, pattern: &str, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(RequestArgs, &mut dyn Output) + Send + Sync + 'static,
    {
        let method = parse_method(verb)?;
        self.route_method(method, pattern, handler)
    }

    pub fn route_method<F>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: F,
    ) -> Result<&mut Self, RouterError>
    where
        F: Fn(RequestArgs, &mut dyn Output) + Send + Sync + 'static,
    {
        self.route_handler(method, pattern, handler)
    }

    pub fn route_handler(
        &mut self,
        method: Method,
        pattern: &str,
        handler: impl Handler + 'static,
    ) -> Result<&mut Self, RouterError> {
        let handler: BoxHandler = Box::new(handler);
        self.router.try_insert(method, pattern, handler)?;
        Ok(self)
    }

    pub(crate) fn shared_error_handler(&self) -> SharedErrorHandler {
        self.on_error.clone()
    }

    /// Matches `(verb, path)` and calls the elected handler. Returns whether
    /// a route was elected.
    ///
    /// `query` is the raw query string without the leading `?`. `body` is
    /// the already-decoded request body. When nothing matches, the error
    /// handler receives `"The route <path> was not found."` with 404 and no
    /// handler runs. Handler panics are not caught here.
    pub fn process(
        &self,
        verb: &str,
        path: &str,
        query: Option<&str>,
        body: Value,
        token: Option<&str>,
        out: &mut dyn Output,
    ) -> bool {
        let mut args = query.map(RequestArgs::from_query).unwrap_or_default();
        args.set_token(token);
        args.set_data(body);

        let found = parse_method(verb)
            .ok()
            .and_then(|method| self.router.find(&method, path));

        let (route, captures) = match found {
            Some(found) => found,
            None => {
                warn!(method = verb, path, "route not found");
                let message = format!("The route {} was not found.", path);
                self.error(&message, StatusCode::NOT_FOUND, out);
                return false;
            }
        };

        debug!(method = verb, path, pattern = %route.pattern(), "route elected");

        args.merge_captures(&captures);
        route.data().call(args, out);
        true
    }
}

macro_rules! define_method {
    ($name:tt, $method:tt) => {
        pub fn $name<F>(&mut self, pattern: &str, handler: F) -> &mut Self
        where
            F: Fn(RequestArgs, &mut dyn Output) + Send + Sync + 'static,
        {
            if let Err(e) = self.route_method(Method::$method, pattern, handler) {
                panic!("{}: pattern = {:?}", e, pattern);
            }
            self
        }
    };
}

impl Dispatcher {
    define_method!(get, GET);
    define_method!(post, POST);
    define_method!(put, PUT);
    define_method!(delete, DELETE);
    define_method!(patch, PATCH);
}
