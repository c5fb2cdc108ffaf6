//! Core traits for post-processing ranked recommendations.
//!
//! Filters run after scoring and ranking, so they only ever remove items;
//! the relative order of the survivors is preserved.

use crate::error::Result;
use crate::scoring::ScoredItem;
use data_loader::InteractionMatrix;

/// What a filter may look at besides the scored items
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub user_id: &'a str,
    /// Row of the user in `matrix`
    pub row: usize,
    pub matrix: &'a InteractionMatrix,
}

/// Core trait for filtering scored items.
///
/// - `Send + Sync` so a fitted model can be shared between threads
/// - Filters take ownership of the Vec and return the kept items
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to items that are already ranked.
    fn apply(&self, items: Vec<ScoredItem>, context: &FilterContext<'_>) -> Result<Vec<ScoredItem>>;
}
