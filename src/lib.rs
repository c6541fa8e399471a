//! A verb/path router that elects routes by comparing wildcard *shapes*.
//!
//! Patterns are `/`-separated segments where a segment starting with `:` is
//! a named wildcard (`/configurations/:id`). An incoming path is expanded
//! into a set of candidate shapes and every route registered under the verb
//! is tested against that set; see [`Matching`] and [`Election`] for the
//! rules and the alternatives.
//!
//! ```
//! use shape_router::Router;
//!
//! let mut router: Router<usize> = Router::new();
//! router.insert("/configurations", 1).insert("/configurations/:id", 2);
//!
//! let (route, captures) = router.find("/configurations/42").unwrap();
//! assert_eq!(*route.data(), 2);
//! assert_eq!(captures.get("id"), Some("42"));
//! ```
//!
//! With the `http-router` feature, [`Dispatcher`] turns a request into a
//! single [`RequestArgs`] bundle and calls the elected handler;
//! `hyper-service` serves a dispatcher over hyper.

#![forbid(unsafe_code)]

mod router;

pub use crate::router::{
    Captures, Election, MatchOptions, Matching, PathShape, Pattern, Route, Router, RouterError,
    Segment, Token,
};

#[cfg(feature = "http-router")]
pub mod http_router;

#[cfg(feature = "http-router")]
pub use crate::http_router::{HttpRouter, Method};

#[cfg(feature = "http-router")]
mod dispatch;

#[cfg(feature = "http-router")]
pub use crate::dispatch::{
    BoxHandler, Dispatcher, ErrorHandler, Handler, LogError, Operation, Output, Rejection,
    Reply, RequestArgs, Resource, RespondWithError,
};

#[cfg(feature = "http-router")]
pub use http::StatusCode;

#[cfg(feature = "hyper-service")]
mod hyper_service;

#[cfg(feature = "hyper-service")]
pub use crate::hyper_service::RouterService;
