//! Turning a user's latent row into one score per item.

use crate::error::{RecommendError, Result};
use data_loader::ItemId;
use factorization::TruncatedSvd;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How predicted scores are computed from the decomposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Rank-K reconstruction of the user's ratings: `latent_row · V_kᵀ[:, j]`
    #[default]
    Reconstruction,
    /// Dot product of every user's latent row with this user's latent row,
    /// read as if indexed by item. Only defined when there are exactly as
    /// many users as items.
    UserSimilarity,
}

/// An item with its predicted score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItem {
    pub item_id: ItemId,
    /// Column of the item in the interaction matrix
    pub column: usize,
    pub score: f64,
}

impl ScoredItem {
    pub fn new(item_id: impl Into<ItemId>, column: usize, score: f64) -> Self {
        Self {
            item_id: item_id.into(),
            column,
            score,
        }
    }
}

/// Raw score vector for the user at `row`, one entry per item column
pub fn score_row(
    svd: &TruncatedSvd,
    row: usize,
    mode: ScoringMode,
    n_items: usize,
) -> Result<Vec<f64>> {
    let latent = svd.transformed().row(row);

    let scores: Vec<f64> = match mode {
        ScoringMode::Reconstruction => (latent * svd.components()).iter().copied().collect(),
        ScoringMode::UserSimilarity => (svd.transformed() * latent.transpose())
            .iter()
            .copied()
            .collect(),
    };

    if scores.len() != n_items {
        return Err(RecommendError::ScoreLabelMismatch {
            scores: scores.len(),
            labels: n_items,
        });
    }
    Ok(scores)
}

/// Stable sort by descending score.
///
/// Equal scores keep their incoming (column) order. NaN scores rank last.
pub fn rank(items: &mut [ScoredItem]) {
    items.sort_by(|a, b| {
        order_key(b.score)
            .partial_cmp(&order_key(a.score))
            .unwrap_or(Ordering::Equal)
    });
}

fn order_key(score: f64) -> f64 {
    if score.is_nan() { f64::NEG_INFINITY } else { score }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[ScoredItem]) -> Vec<&str> {
        items.iter().map(|i| i.item_id.as_str()).collect()
    }

    #[test]
    fn test_rank_descending() {
        let mut items = vec![
            ScoredItem::new("a", 0, 1.0),
            ScoredItem::new("b", 1, 3.0),
            ScoredItem::new("c", 2, 2.0),
        ];
        rank(&mut items);
        assert_eq!(ids(&items), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_rank_ties_keep_column_order() {
        let mut items = vec![
            ScoredItem::new("a", 0, 1.0),
            ScoredItem::new("b", 1, 2.0),
            ScoredItem::new("c", 2, 1.0),
            ScoredItem::new("d", 3, 2.0),
            ScoredItem::new("e", 4, -0.0),
            ScoredItem::new("f", 5, 0.0),
        ];
        rank(&mut items);
        assert_eq!(ids(&items), vec!["b", "d", "a", "c", "e", "f"]);
    }

    #[test]
    fn test_rank_nan_last() {
        let mut items = vec![
            ScoredItem::new("a", 0, f64::NAN),
            ScoredItem::new("b", 1, -5.0),
        ];
        rank(&mut items);
        assert_eq!(ids(&items), vec!["b", "a"]);
    }
}
