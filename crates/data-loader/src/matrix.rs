//! Building the dense interaction matrix.
//!
//! The pivot works in three passes over the records:
//! 1. Collect the distinct user and item ids
//! 2. Sort them per axis (numeric if every id is an integer) and assign indices
//! 3. Write every rating into its cell, later records overwriting earlier ones

use crate::error::Result;
use crate::parser;
use crate::types::*;
use nalgebra::DMatrix;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, instrument};

impl InteractionMatrix {
    /// Load an interactions file and pivot it into a matrix
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path, format: &CsvFormat) -> Result<Self> {
        let interactions = parser::parse_interactions(path, format)?;
        info!("Loaded {} interactions", interactions.len());

        let matrix = Self::from_interactions(&interactions);
        let (rows, cols) = matrix.shape();
        info!(
            "Built {}x{} interaction matrix ({} observed, density {:.4})",
            rows,
            cols,
            matrix.observed(),
            matrix.density()
        );
        Ok(matrix)
    }

    /// Pivot interaction records into a dense user × item matrix
    ///
    /// Pairs without a record are zero. Duplicate pairs are not rejected;
    /// the last one in input order wins.
    pub fn from_interactions(interactions: &[Interaction]) -> Self {
        let users = sorted_distinct(interactions.iter().map(|i| i.user_id.as_str()));
        let items = sorted_distinct(interactions.iter().map(|i| i.item_id.as_str()));

        let user_index: HashMap<UserId, usize> = users
            .iter()
            .enumerate()
            .map(|(row, id)| (id.clone(), row))
            .collect();
        let item_index: HashMap<ItemId, usize> = items
            .iter()
            .enumerate()
            .map(|(col, id)| (id.clone(), col))
            .collect();

        let mut values = DMatrix::zeros(users.len(), items.len());
        let mut observed = vec![HashSet::new(); users.len()];
        let mut duplicates = 0usize;

        for interaction in interactions {
            let row = user_index[interaction.user_id.as_str()];
            let col = item_index[interaction.item_id.as_str()];
            values[(row, col)] = interaction.rating;
            if !observed[row].insert(col) {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            debug!("{} duplicate (user, item) pairs overwritten", duplicates);
        }

        Self {
            users,
            items,
            user_index,
            item_index,
            values,
            observed,
        }
    }
}

/// Distinct ids in pivot order.
///
/// The order is chosen per axis: if every id parses as an integer the ids
/// sort numerically (`"2"` before `"10"`, ties such as `"7"` and `"007"`
/// broken by string order), otherwise the whole axis sorts as strings.
fn sorted_distinct<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let distinct: HashSet<&str> = ids.collect();
    let mut sorted: Vec<String> = distinct.into_iter().map(str::to_string).collect();

    let numeric: Option<Vec<i64>> = sorted.iter().map(|id| id.parse().ok()).collect();
    match numeric {
        Some(values) => {
            let mut keyed: Vec<(i64, String)> = values.into_iter().zip(sorted).collect();
            keyed.sort();
            keyed.into_iter().map(|(_, id)| id).collect()
        }
        None => {
            sorted.sort();
            sorted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Interaction> {
        vec![
            Interaction::new("u1", "b1", 5.0),
            Interaction::new("u1", "b2", 1.0),
            Interaction::new("u2", "b1", 4.0),
            Interaction::new("u2", "b3", 5.0),
        ]
    }

    #[test]
    fn test_pivot_shape_and_labels() {
        let matrix = InteractionMatrix::from_interactions(&sample());

        assert_eq!(matrix.shape(), (2, 3));
        assert_eq!(matrix.users(), &["u1".to_string(), "u2".to_string()]);
        assert_eq!(
            matrix.items(),
            &["b1".to_string(), "b2".to_string(), "b3".to_string()]
        );
        assert_eq!(matrix.user_index("u2"), Some(1));
        assert_eq!(matrix.item_index("b3"), Some(2));
        assert_eq!(matrix.user_index("u9"), None);
    }

    #[test]
    fn test_missing_pairs_are_zero() {
        let matrix = InteractionMatrix::from_interactions(&sample());

        assert_eq!(matrix.user_row("u1").unwrap(), vec![5.0, 1.0, 0.0]);
        assert_eq!(matrix.user_row("u2").unwrap(), vec![4.0, 0.0, 5.0]);
        assert_eq!(matrix.observed(), 4);
        assert!((matrix.density() - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_numeric_ids_sort_numerically() {
        let interactions = vec![
            Interaction::new("10", "200", 3.0),
            Interaction::new("2", "30", 4.0),
        ];
        let matrix = InteractionMatrix::from_interactions(&interactions);

        assert_eq!(matrix.users(), &["2".to_string(), "10".to_string()]);
        assert_eq!(matrix.items(), &["30".to_string(), "200".to_string()]);
    }

    #[test]
    fn test_mixed_ids_sort_as_strings() {
        let ids = ["9", "10", "1a", "b", "100"];
        assert_eq!(sorted_distinct(ids.into_iter()), vec!["10", "100", "1a", "9", "b"]);

        let interactions = vec![
            Interaction::new("9", "x", 1.0),
            Interaction::new("10", "x", 2.0),
            Interaction::new("1a", "x", 3.0),
        ];
        let matrix = InteractionMatrix::from_interactions(&interactions);
        assert_eq!(matrix.users(), &["10".to_string(), "1a".to_string(), "9".to_string()]);
        assert_eq!(matrix.user_row("9").unwrap(), vec![1.0]);
    }

    #[test]
    fn test_many_mixed_ids_are_totally_ordered() {
        let ids: Vec<String> = (0..2000)
            .map(|i| match i % 3 {
                0 => (i * 7919 % 1000).to_string(),
                1 => format!("{}a", i % 97),
                _ => format!("u{}", i),
            })
            .collect();
        let sorted = sorted_distinct(ids.iter().map(String::as_str));

        assert!(sorted.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_numeric_ties_keep_distinct_ids() {
        let sorted = sorted_distinct(["007", "7", "-3", "12"].into_iter());
        assert_eq!(sorted, vec!["-3", "007", "7", "12"]);
    }

    #[test]
    fn test_duplicates_last_write_wins() {
        let interactions = vec![
            Interaction::new("u1", "b1", 2.0),
            Interaction::new("u1", "b1", 4.0),
        ];
        let matrix = InteractionMatrix::from_interactions(&interactions);

        assert_eq!(matrix.shape(), (1, 1));
        assert_eq!(matrix.values()[(0, 0)], 4.0);
        assert_eq!(matrix.observed(), 1);
    }

    #[test]
    fn test_rated_items_include_zero_ratings() {
        let interactions = vec![
            Interaction::new("u1", "b2", 0.0),
            Interaction::new("u1", "b1", 3.0),
            Interaction::new("u2", "b3", 1.0),
        ];
        let matrix = InteractionMatrix::from_interactions(&interactions);

        let rated = matrix.rated_items("u1");
        assert_eq!(rated, vec![("b1".to_string(), 3.0), ("b2".to_string(), 0.0)]);
        assert!(matrix.is_observed(0, 1));
        assert!(!matrix.is_observed(0, 2));
    }

    #[test]
    fn test_no_interactions() {
        let matrix = InteractionMatrix::from_interactions(&[]);
        assert!(matrix.is_empty());
        assert_eq!(matrix.shape(), (0, 0));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "data_loader_matrix_{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, "user_id,book_id,rating\n1,7,5\n2,7,3\n2,8,4\n").unwrap();

        let matrix = InteractionMatrix::load(&path, &CsvFormat::default()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(matrix.shape(), (2, 2));
        assert_eq!(matrix.user_row("2").unwrap(), vec![3.0, 4.0]);
    }
}
