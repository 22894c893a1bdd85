use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A cuisine mapped onto the recommender's vocabulary
///
/// Produced by [`CuisineNormalizer`](crate::services::cuisine::CuisineNormalizer). The set is
/// open-ended: inputs that match no rule fall back to their title-cased text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalCuisine(String);

impl CanonicalCuisine {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CanonicalCuisine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for CanonicalCuisine {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CanonicalCuisine {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
