use super::captures::Captures;
use super::error::RouterError;
use super::options::MatchOptions;
use super::pattern::split_path;
use super::{Route, Router};

use std::collections::HashMap;

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    pub fn new() -> Self {
        Self::with_options(MatchOptions::default())
    }

    pub fn with_options(options: MatchOptions) -> Self {
        Self {
            routes: Vec::new(),
            index: HashMap::new(),
            options,
        }
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    pub fn set_options(&mut self, options: MatchOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn clear(&mut self) {
        self.routes.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in registration order. A replaced route keeps the slot of the
    /// registration it replaced.
    pub fn routes(&self) -> impl Iterator<Item = &Route<T>> + '_ {
        self.routes.iter()
    }

    pub fn get(&self, pattern: &str) -> Option<&Route<T>> {
        self.index.get(pattern).map(|&id| &self.routes[id])
    }

    pub fn find<'s, 'p, 't>(&'s self, path: &'p str) -> Option<(&'t Route<T>, Captures<'p>)>
    where
        's: 'p + 't,
    {
        let parts = split_path(path);
        let id = self.find_with_parts(&parts)?;
        let route = &self.routes[id];
        Some((route, Captures::extract(&route.pattern, &parts)))
    }

    pub fn insert(&mut self, pattern: &str, data: T) -> &mut Self {
        if let Err(e) = self.insert_route(pattern, data) {
            panic!("{}: pattern = {:?}", e, pattern);
        }
        self
    }

    pub fn try_insert(&mut self, pattern: &str, data: T) -> Result<&mut Self, RouterError> {
        self.insert_route(pattern, data)?;
        Ok(self)
    }

    /// Inserts or replaces the route and returns it.
    pub fn register(&mut self, pattern: &str, data: T) -> Result<&Route<T>, RouterError> {
        let id = self.insert_route(pattern, data)?;
        Ok(&self.routes[id])
    }
}
