//! The FilterPipeline chains filters over a ranked item list.

use crate::error::Result;
use crate::scoring::ScoredItem;
use crate::traits::{Filter, FilterContext};
use tracing::debug;

/// Chains multiple filters together, applied in insertion order.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(AlreadyRatedFilter)
///     .add_filter(MinimumScoreFilter::new(0.5));
///
/// let kept = pipeline.apply(ranked, &context)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Names of the filters, in application order
    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence.
    pub fn apply(
        &self,
        items: Vec<ScoredItem>,
        context: &FilterContext<'_>,
    ) -> Result<Vec<ScoredItem>> {
        let mut current = items;
        for filter in &self.filters {
            debug!(
                "Applying filter: {} for user {} (input count: {})",
                filter.name(),
                context.user_id,
                current.len()
            );
            current = filter.apply(current, context)?;
            debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
