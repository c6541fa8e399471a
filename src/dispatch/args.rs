use crate::router::Captures;

use std::ops::Index;
use std::str::FromStr;

use serde_json::{Map, Value};

pub const DATA: &str = "data";
pub const TOKEN: &str = "token";

static NULL: Value = Value::Null;

/// The flat key/value bundle handed to a handler.
///
/// Entries are written in this order: query parameters, `token`, `data`,
/// then path parameters. Later writes replace earlier ones, so a path
/// parameter named like a query key (or like `token`/`data`) wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestArgs {
    map: Map<String, Value>,
}

impl RequestArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `a=1&b=2`. A key given more than once collects its values
    /// into an array of strings.
    pub fn from_query(query: &str) -> Self {
        let mut map = Map::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let value = Value::String(value.into_owned());
            match map.get_mut(key.as_ref()) {
                Some(Value::Array(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(key.into_owned(), value);
                }
            }
        }
        Self { map }
    }

    /// An absent token is stored as `null` so that a `token` query key never
    /// survives.
    pub fn set_token(&mut self, token: Option<&str>) {
        let value = token.map_or(Value::Null, |t| Value::String(t.to_owned()));
        self.map.insert(TOKEN.to_owned(), value);
    }

    pub fn set_data(&mut self, data: Value) {
        self.map.insert(DATA.to_owned(), data);
    }

    pub fn merge_captures(&mut self, captures: &Captures<'_>) {
        for &(name, value) in captures.iter() {
            self.map
                .insert(name.to_owned(), Value::String(value.to_owned()));
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.get_str(TOKEN)
    }

    pub fn data(&self) -> &Value {
        self.get(DATA).unwrap_or(&NULL)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(Value::as_str)
    }

    pub fn parse<T: FromStr>(&self, key: &str) -> Option<Result<T, T::Err>> {
        self.get_str(key).map(T::from_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.map.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.map.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> + '_ {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.map
    }
}

impl Index<&str> for RequestArgs {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl From<RequestArgs> for Value {
    fn from(args: RequestArgs) -> Self {
        Value::Object(args.map)
    }
}
