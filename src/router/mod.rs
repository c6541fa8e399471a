mod captures;
mod core;
mod error;
mod imp;
mod options;
mod pattern;

pub use self::captures::Captures;
pub use self::error::RouterError;
pub use self::options::{Election, MatchOptions, Matching};
pub use self::pattern::{PathShape, Pattern, Segment, Token};

pub(crate) use self::pattern::split_path;

use std::collections::HashMap;

/// The routes registered under one verb.
#[derive(Debug)]
pub struct Router<T> {
    routes: Vec<Route<T>>,
    index: HashMap<Box<str>, usize>,
    options: MatchOptions,
}

#[derive(Debug)]
pub struct Route<T> {
    pattern: Pattern,
    data: T,
}

impl<T> Route<T> {
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn data(&self) -> &T {
        &self.data
    }
}
