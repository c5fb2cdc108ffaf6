//! Filter to remove items the user has already rated.

use crate::error::Result;
use crate::scoring::ScoredItem;
use crate::traits::{Filter, FilterContext};

/// Removes items the user has an observed record for.
///
/// An explicit rating of zero still counts as rated, even though the dense
/// matrix cannot tell it apart from a missing pair.
pub struct AlreadyRatedFilter;

impl Filter for AlreadyRatedFilter {
    fn name(&self) -> &str {
        "AlreadyRatedFilter"
    }

    fn apply(&self, items: Vec<ScoredItem>, context: &FilterContext<'_>) -> Result<Vec<ScoredItem>> {
        let filtered: Vec<ScoredItem> = items
            .into_iter()
            .filter(|item| !context.matrix.is_observed(context.row, item.column))
            .collect();
        Ok(filtered)
    }
}
