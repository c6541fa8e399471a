mod router;
mod router_macro;

pub use self::router::HttpRouter;

pub use http::Method;

use crate::router::RouterError;

/// Parses a verb, upper-casing it first so `get` and `GET` are the same.
pub fn parse_method(verb: &str) -> Result<Method, RouterError> {
    Method::from_bytes(verb.to_ascii_uppercase().as_bytes())
        .map_err(|_| RouterError::new("invalid method token"))
}
