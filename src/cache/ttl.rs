//! TTL categories.
//!
//! Every cached result lives under one of three freshness classes, chosen
//! from the kind of resource it came from. Durations are a tuning knob; the
//! contract is only the relative ordering (metadata lives at least as long
//! as aggregates, aggregates at least as long as raw rows).

use std::collections::HashSet;

// == TTL Category ==
/// Freshness class of a cached resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlCategory {
    /// Long-lived reference data (category lists, settings sheets)
    Metadata,
    /// Medium-lived aggregate and user data
    Aggregate,
    /// Short-lived raw row data
    RawRows,
}

// == TTL Settings ==
/// Concrete duration per category, in seconds.
#[derive(Debug, Clone)]
pub struct TtlSettings {
    /// TTL for metadata-class resources
    pub metadata_secs: u64,
    /// TTL for aggregate-class resources
    pub aggregate_secs: u64,
    /// TTL for raw row data
    pub raw_secs: u64,
}

impl TtlSettings {
    /// Returns the duration in seconds for a category.
    pub fn duration_secs(&self, category: TtlCategory) -> u64 {
        match category {
            TtlCategory::Metadata => self.metadata_secs,
            TtlCategory::Aggregate => self.aggregate_secs,
            TtlCategory::RawRows => self.raw_secs,
        }
    }
}

impl Default for TtlSettings {
    fn default() -> Self {
        Self {
            metadata_secs: 3600,
            aggregate_secs: 600,
            raw_secs: 120,
        }
    }
}

// == Resource Catalog ==
/// Maps resource names to their TTL category.
///
/// Names are configured, not inferred; anything unlisted is treated as raw
/// row data and gets the shortest TTL.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    metadata: HashSet<String>,
    aggregate: HashSet<String>,
}

impl ResourceCatalog {
    // == Constructor ==
    /// Builds a catalog from metadata-class and aggregate-class name lists.
    pub fn new<I, J>(metadata: I, aggregate: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        Self {
            metadata: metadata.into_iter().collect(),
            aggregate: aggregate.into_iter().collect(),
        }
    }

    // == Classify ==
    /// Returns the TTL category for a resource name.
    pub fn category_for(&self, resource: &str) -> TtlCategory {
        if self.metadata.contains(resource) {
            TtlCategory::Metadata
        } else if self.aggregate.contains(resource) {
            TtlCategory::Aggregate
        } else {
            TtlCategory::RawRows
        }
    }
}
