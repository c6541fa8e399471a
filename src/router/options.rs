use serde::Deserialize;

/// How candidate shapes are generated for an incoming path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Matching {
    /// The chained permutation walk. It reaches trailing and some interior
    /// wildcard placements, but not every one of them: `/:/b/c` and
    /// `/a/:/:/d` never match.
    Chained,
    /// Every wildcard placement is accepted.
    Exhaustive,
}

/// Which route wins when several shapes match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Election {
    /// The last matching route in registration order.
    LastMatch,
    /// The route with the fewest wildcard segments; ties go to the route
    /// registered first.
    MostSpecific,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    pub matching: Matching,
    pub election: Election,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            matching: Matching::Chained,
            election: Election::LastMatch,
        }
    }
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matching(mut self, matching: Matching) -> Self {
        self.matching = matching;
        self
    }

    pub fn election(mut self, election: Election) -> Self {
        self.election = election;
        self
    }
}
