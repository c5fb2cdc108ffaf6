//! Core domain types for user-item interaction data.
//!
//! - Type aliases for domain clarity (UserId, ItemId)
//! - The raw [`Interaction`] record read from disk
//! - [`CsvFormat`], describing how the interactions file is laid out
//! - [`InteractionMatrix`], the dense user × item rating table

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a user, kept exactly as it appears in the source file
pub type UserId = String;

/// Identifier of an item (a book in the bundled dataset)
pub type ItemId = String;

// =============================================================================
// Interaction Record
// =============================================================================

/// A single rating given by a user to an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub rating: f64,
}

impl Interaction {
    pub fn new(user_id: impl Into<UserId>, item_id: impl Into<ItemId>, rating: f64) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
            rating,
        }
    }
}

// =============================================================================
// File Layout
// =============================================================================

/// Layout of a delimited interactions file.
///
/// Columns are located by header name, so their order in the file does not
/// matter and extra columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvFormat {
    pub delimiter: char,
    pub user_column: String,
    pub item_column: String,
    pub rating_column: String,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            delimiter: ',',
            user_column: "user_id".to_string(),
            item_column: "book_id".to_string(),
            rating_column: "rating".to_string(),
        }
    }
}

impl CsvFormat {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_columns(
        mut self,
        user_column: impl Into<String>,
        item_column: impl Into<String>,
        rating_column: impl Into<String>,
    ) -> Self {
        self.user_column = user_column.into();
        self.item_column = item_column.into();
        self.rating_column = rating_column.into();
        self
    }
}

// =============================================================================
// InteractionMatrix - dense pivot of all interactions
// =============================================================================

/// Dense user × item rating matrix with label lookups.
///
/// Rows are users and columns are items, both in ascending id order:
/// numeric when every id of that axis is an integer, string order otherwise.
/// A cell holds the rating if the pair was observed and
/// `0.0` otherwise, so "not rated" and "rated zero" look the same in
/// [`values`](Self::values). Observed pairs are tracked separately.
#[derive(Debug, Clone)]
pub struct InteractionMatrix {
    pub(crate) users: Vec<UserId>,
    pub(crate) items: Vec<ItemId>,
    pub(crate) user_index: HashMap<UserId, usize>,
    pub(crate) item_index: HashMap<ItemId, usize>,
    pub(crate) values: DMatrix<f64>,
    /// Column indices with an observed record, per user row
    pub(crate) observed: Vec<HashSet<usize>>,
}

impl InteractionMatrix {
    /// Creates an empty `0 × 0` matrix
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            items: Vec::new(),
            user_index: HashMap::new(),
            item_index: HashMap::new(),
            values: DMatrix::zeros(0, 0),
            observed: Vec::new(),
        }
    }

    /// User ids in row order
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    /// Item ids in column order
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Row index of a user, if known
    pub fn user_index(&self, user_id: &str) -> Option<usize> {
        self.user_index.get(user_id).copied()
    }

    /// Column index of an item, if known
    pub fn item_index(&self, item_id: &str) -> Option<usize> {
        self.item_index.get(item_id).copied()
    }

    /// The dense rating values
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// `(rows, columns)` = `(users, items)`
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() || self.items.is_empty()
    }

    /// The full rating row of a user (zeros included), in item column order
    pub fn user_row(&self, user_id: &str) -> Option<Vec<f64>> {
        let row = self.user_index(user_id)?;
        Some(self.values.row(row).iter().copied().collect())
    }

    /// Items the user has an observed record for, in item column order
    pub fn rated_items(&self, user_id: &str) -> Vec<(ItemId, f64)> {
        let Some(row) = self.user_index(user_id) else {
            return Vec::new();
        };
        let mut columns: Vec<usize> = self.observed[row].iter().copied().collect();
        columns.sort_unstable();
        columns
            .into_iter()
            .map(|col| (self.items[col].clone(), self.values[(row, col)]))
            .collect()
    }

    /// Whether the user has an observed record for the item column
    pub fn is_observed(&self, row: usize, column: usize) -> bool {
        self.observed
            .get(row)
            .is_some_and(|cols| cols.contains(&column))
    }

    /// Number of distinct observed (user, item) pairs
    pub fn observed(&self) -> usize {
        self.observed.iter().map(|cols| cols.len()).sum()
    }

    /// Fraction of cells with an observed record (0 for an empty matrix)
    pub fn density(&self) -> f64 {
        let (rows, cols) = self.shape();
        if rows == 0 || cols == 0 {
            return 0.0;
        }
        self.observed() as f64 / (rows * cols) as f64
    }
}

impl Default for InteractionMatrix {
    fn default() -> Self {
        Self::new()
    }
}
