//! Filter to drop weakly predicted items.

use crate::error::Result;
use crate::scoring::ScoredItem;
use crate::traits::{Filter, FilterContext};

/// Removes items whose predicted score is below a threshold.
///
/// NaN scores never pass.
pub struct MinimumScoreFilter {
    min_score: f64,
}

impl MinimumScoreFilter {
    pub fn new(min_score: f64) -> Self {
        Self { min_score }
    }
}

impl Filter for MinimumScoreFilter {
    fn name(&self) -> &str {
        "MinimumScoreFilter"
    }

    fn apply(&self, items: Vec<ScoredItem>, _context: &FilterContext<'_>) -> Result<Vec<ScoredItem>> {
        let filtered: Vec<ScoredItem> = items
            .into_iter()
            .filter(|item| item.score >= self.min_score)
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Interaction, InteractionMatrix};

    #[test]
    fn test_minimum_score_filter() {
        let matrix = InteractionMatrix::from_interactions(&[Interaction::new("u1", "b1", 1.0)]);
        let context = FilterContext { user_id: "u1", row: 0, matrix: &matrix };

        let items = vec![
            ScoredItem::new("b1", 0, 2.5),
            ScoredItem::new("b2", 1, 2.0),
            ScoredItem::new("b3", 2, f64::NAN),
            ScoredItem::new("b4", 3, 1.9),
        ];

        let filtered = MinimumScoreFilter::new(2.0).apply(items, &context).unwrap();

        let ids: Vec<&str> = filtered.iter().map(|i| i.item_id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);
    }
}
