use super::args::RequestArgs;
use super::dispatcher::Dispatcher;
use super::output::Output;
use crate::http_router::Method;
use crate::router::RouterError;

use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;
use tracing::debug;

/// A collection exposed through the five conventional routes. Returning
/// `None` means "not found".
pub trait Resource: Send + Sync {
    fn index(&self, args: &RequestArgs) -> Option<Value>;
    fn show(&self, args: &RequestArgs) -> Option<Value>;
    fn create(&self, args: &RequestArgs) -> Option<Value>;
    fn update(&self, args: &RequestArgs) -> Option<Value>;
    fn destroy(&self, args: &RequestArgs) -> Option<Value>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Index,
    Show,
    Create,
    Update,
    Destroy,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Index,
        Operation::Show,
        Operation::Create,
        Operation::Update,
        Operation::Destroy,
    ];

    pub fn method(self) -> Method {
        match self {
            Operation::Index | Operation::Show => Method::GET,
            Operation::Create => Method::POST,
            Operation::Update => Method::PUT,
            Operation::Destroy => Method::DELETE,
        }
    }

    pub fn pattern(self, base: &str) -> String {
        match self {
            Operation::Index | Operation::Create => base.to_owned(),
            Operation::Show | Operation::Update | Operation::Destroy => format!("{}/:id", base),
        }
    }

    pub fn invoke<R: Resource + ?Sized>(self, resource: &R, args: &RequestArgs) -> Option<Value> {
        match self {
            Operation::Index => resource.index(args),
            Operation::Show => resource.show(args),
            Operation::Create => resource.create(args),
            Operation::Update => resource.update(args),
            Operation::Destroy => resource.destroy(args),
        }
    }
}

/// Returned by a pre-hook to stop the request before the operation runs.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct Rejection {
    pub message: String,
    pub status: StatusCode,
}

impl Rejection {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::UNAUTHORIZED)
    }
}

impl Dispatcher {
    /// Registers `GET base`, `GET base/:id`, `POST base`, `PUT base/:id` and
    /// `DELETE base/:id` against `resource`.
    ///
    /// Every handler first runs `pre_hook`. A rejection goes to the error
    /// handler and the operation is skipped. Otherwise the
    /// operation's result goes to `post_hook`.
    pub fn resources<R, Pre, Post>(
        &mut self,
        base: &str,
        resource: Arc<R>,
        pre_hook: Pre,
        post_hook: Post,
    ) -> Result<&mut Self, RouterError>
    where
        R: Resource + ?Sized + 'static,
        Pre: Fn(&RequestArgs) -> Result<(), Rejection> + Send + Sync + 'static,
        Post: Fn(&RequestArgs, Option<Value>, &mut dyn Output) + Send + Sync + 'static,
    {
        let pre_hook = Arc::new(pre_hook);
        let post_hook = Arc::new(post_hook);
        let on_error = self.shared_error_handler();

        for op in Operation::ALL {
            let resource = Arc::clone(&resource);
            let pre_hook = Arc::clone(&pre_hook);
            let post_hook = Arc::clone(&post_hook);
            let on_error = on_error.clone();

            self.route_method(op.method(), &op.pattern(base), move |args, out| {
                if let Err(rejection) = pre_hook(&args) {
                    debug!(operation = ?op, status = rejection.status.as_u16(), "request rejected");
                    on_error.handle(&rejection.message, rejection.status, out);
                    return;
                }
                let result = op.invoke(&*resource, &args);
                post_hook(&args, result, out);
            })?;
        }

        Ok(self)
    }
}
