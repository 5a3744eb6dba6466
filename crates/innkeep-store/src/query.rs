//! # Query Options
//!
//! Filter, order and limit for [`DocumentStore::select`](crate::DocumentStore::select).
//!
//! ## Evaluation Order
//! ```text
//! collection ──► filter (AND of exact matches)
//!            ──► stable sort on one field
//!            ──► truncate to limit
//! ```

use innkeep_core::{compare_values, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sort key for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

fn default_ascending() -> bool {
    true
}

/// Options for a `select`.
///
/// ## Example
/// ```rust
/// use innkeep_store::SelectOptions;
///
/// let options = SelectOptions::new()
///     .filter("status", "occupied")
///     .order_by_desc("created_at")
///     .limit(10);
/// assert_eq!(options.limit, Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectOptions {
    /// Field name → required value. Every entry must match.
    #[serde(default)]
    pub filters: Map<String, Value>,

    #[serde(default)]
    pub order_by: Option<OrderBy>,

    #[serde(default)]
    pub limit: Option<usize>,
}

impl SelectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exact-match filter. A repeated field replaces the earlier value.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    /// Orders ascending on `field`.
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            ascending: true,
        });
        self
    }

    /// Orders descending on `field`.
    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            ascending: false,
        });
        self
    }

    /// Keeps at most `n` records.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Applies the options to a collection, cloning only what is returned.
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        let mut selected: Vec<&Record> = records
            .iter()
            .filter(|record| record.matches(&self.filters))
            .collect();

        if let Some(order) = &self.order_by {
            // sort_by is stable; reversing the comparator keeps ties in
            // insertion order for descending sorts too
            selected.sort_by(|a, b| {
                let ordering = compare_values(a.get(&order.field), b.get(&order.field));
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }

        selected.into_iter().cloned().collect()
    }
}
