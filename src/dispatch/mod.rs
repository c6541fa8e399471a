mod args;
mod dispatcher;
mod handler;
mod output;
mod resource;

pub use self::args::{RequestArgs, DATA, TOKEN};
pub use self::dispatcher::Dispatcher;
pub use self::handler::{BoxHandler, Handler};
pub use self::output::{ErrorHandler, LogError, Output, Reply, RespondWithError};
pub use self::resource::{Operation, Rejection, Resource};
