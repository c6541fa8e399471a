use super::{parse_method, Method};
use crate::router::{Captures, MatchOptions, Route, Router, RouterError};

use std::collections::HashMap;

/// Routes keyed by verb, then by pattern string.
#[derive(Debug)]
pub struct HttpRouter<T> {
    method_map: HashMap<Method, Router<T>>,
    options: MatchOptions,
}

impl<T> Default for HttpRouter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HttpRouter<T> {
    pub fn new() -> Self {
        Self::with_options(MatchOptions::default())
    }

    pub fn with_options(options: MatchOptions) -> Self {
        Self {
            method_map: HashMap::new(),
            options,
        }
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    pub fn set_options(&mut self, options: MatchOptions) -> &mut Self {
        self.options = options;
        for router in self.method_map.values_mut() {
            router.set_options(options);
        }
        self
    }

    pub fn find<'s, 'p, 't>(
        &'s self,
        method: &Method,
        path: &'p str,
    ) -> Option<(&'t Route<T>, Captures<'p>)>
    where
        's: 'p + 't,
    {
        self.method_map.get(method)?.find(path)
    }

    pub fn insert(&mut self, method: Method, pattern: &str, data: T) -> &mut Self {
        self.access_router(method).insert(pattern, data);
        self
    }

    pub fn try_insert(
        &mut self,
        method: Method,
        pattern: &str,
        data: T,
    ) -> Result<&mut Self, RouterError> {
        self.access_router(method).try_insert(pattern, data)?;
        Ok(self)
    }

    /// Registers under a verb given as text, e.g. `"get"`.
    pub fn register(&mut self, verb: &str, pattern: &str, data: T) -> Result<&Route<T>, RouterError> {
        let method = parse_method(verb)?;
        self.access_router(method).register(pattern, data)
    }

    /// All routes of a verb in registration order; empty when the verb has
    /// none.
    pub fn lookup_all<'s>(&'s self, method: &Method) -> impl Iterator<Item = &'s Route<T>> + 's {
        self.method_map
            .get(method)
            .into_iter()
            .flat_map(|router| router.routes())
    }

    pub fn contains_method(&self, method: &Method) -> bool {
        self.method_map.contains_key(method)
    }
}

impl<T> HttpRouter<T> {
    fn access_router(&mut self, method: Method) -> &mut Router<T> {
        let options = self.options;
        self.method_map
            .entry(method)
            .or_insert_with(|| Router::with_options(options))
    }
}
