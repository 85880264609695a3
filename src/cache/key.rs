//! Typed cache keys.
//!
//! Every cached result is addressed by a [`CacheKey`] built through one of
//! two constructors. The read path and the invalidation path both go through
//! the same constructor, so a writer can never invalidate a different string
//! than the one the reader cached under.

use std::fmt;

// == Cache Key ==
/// Deterministic key for a cached backend result.
///
/// Range keys are `resource!range`; batch keys sort their parts before
/// joining, so the same set of requests produces the same key regardless of
/// call order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    // == Range Key ==
    /// Key for a single resource and column range.
    pub fn for_range(resource: &str, range: &str) -> Self {
        Self(format!("{}!{}", resource, range))
    }

    // == Batch Key ==
    /// Composite key for a multi-range read.
    ///
    /// Parts are normalized by sorting, so two batches with the same members
    /// in different order share one cache entry.
    pub fn for_batch<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut joined: Vec<String> = parts
            .into_iter()
            .map(|(resource, range)| format!("{}!{}", resource, range))
            .collect();
        joined.sort();
        Self(format!("batch:{}", joined.join("|")))
    }

    /// The key as a string slice, for logging.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
