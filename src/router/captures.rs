use super::pattern::{Pattern, Segment};

use std::ops::Deref;
use std::str::FromStr;

use smallvec::SmallVec;

/// Wildcard values bound from the incoming path, in pattern order.
#[derive(Debug)]
pub struct Captures<'a> {
    buf: SmallVec<[(&'a str, &'a str); 8]>,
}

impl Captures<'_> {
    /// A name bound twice resolves to its rightmost segment.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.buf
            .iter()
            .rev()
            .find_map(|&(k, v)| if name == k { Some(v) } else { None })
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.get(name).map(T::from_str)
    }
}

impl<'a> Deref for Captures<'a> {
    type Target = [(&'a str, &'a str)];
    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl<'a> Captures<'a> {
    pub(super) fn extract(pattern: &'a Pattern, parts: &[&'a str]) -> Self {
        let buf = pattern
            .segments()
            .iter()
            .zip(parts)
            .filter_map(|(seg, &part)| match seg {
                Segment::Wildcard(name) => Some((&**name, part)),
                Segment::Literal(_) => None,
            })
            .collect();
        Self { buf }
    }
}
