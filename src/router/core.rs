use super::options::{Election, Matching};
use super::pattern::{PathShape, Pattern};
use super::{Route, Router, RouterError};

use smallvec::SmallVec;
use tracing::debug;

pub(crate) type Permutations<'p> = SmallVec<[PathShape<'p>; 8]>;

/// Candidate shapes for a split path.
///
/// The all-literal shape comes first. Then for every position `i` from the
/// last down to 1, the shape with only `i` wildcarded is added, followed by
/// the chain obtained by wildcarding positions `0, 1, .., n-1` one after the
/// other on top of it. Position 0 is never wildcarded on its own, and the
/// chain compounds instead of resetting, so this is a small subset of all
/// `2^n` placements.
pub(crate) fn permutations<'p>(parts: &[&'p str]) -> Permutations<'p> {
    let literal = PathShape::literal(parts);

    let mut set: Permutations<'p> = SmallVec::new();
    set.push(literal.clone());

    for i in (1..parts.len()).rev() {
        let mut work = literal.clone();
        work.set_wildcard(i);
        push_unique(&mut set, work.clone());

        for j in 0..parts.len() {
            work.set_wildcard(j);
            push_unique(&mut set, work.clone());
        }
    }

    set
}

fn push_unique<'p>(set: &mut Permutations<'p>, shape: PathShape<'p>) {
    if !set.contains(&shape) {
        set.push(shape);
    }
}

impl<T> Router<T> {
    pub(super) fn insert_route(&mut self, pattern: &str, data: T) -> Result<usize, RouterError> {
        let pattern = Pattern::parse(pattern)?;

        if let Some(&id) = self.index.get(pattern.as_str()) {
            debug!(pattern = %pattern, "replacing route handler");
            self.routes[id] = Route { pattern, data };
            return Ok(id);
        }

        let id = self.routes.len();
        self.index.insert(pattern.as_str().into(), id);
        self.routes.push(Route { pattern, data });
        Ok(id)
    }

    pub(super) fn find_with_parts(&self, parts: &[&str]) -> Option<usize> {
        if self.routes.is_empty() {
            return None;
        }

        let candidates = match self.options.matching {
            Matching::Chained => Some(permutations(parts)),
            Matching::Exhaustive => None,
        };

        let accepts = |pattern: &Pattern| -> bool {
            if pattern.segments().len() != parts.len() {
                return false;
            }
            match candidates {
                Some(ref set) => {
                    let shape = pattern.shape();
                    set.iter().any(|s| s.tokens() == shape.tokens())
                }
                None => pattern.accepts(parts),
            }
        };

        let mut elected: Option<usize> = None;

        for (id, route) in self.routes.iter().enumerate() {
            if !accepts(&route.pattern) {
                continue;
            }
            elected = match (self.options.election, elected) {
                (Election::MostSpecific, Some(prev))
                    if self.routes[prev].pattern.wildcard_count()
                        <= route.pattern.wildcard_count() =>
                {
                    Some(prev)
                }
                _ => Some(id),
            };
        }

        elected
    }
}
