use serde::{Deserialize, Serialize};

use super::itemset::Itemset;

/// An itemset that passed the minimum-support filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRecord {
    pub itemset: Itemset,
    /// Number of transactions containing every member of the itemset
    pub frequency: usize,
    /// Percentage of transactions: 100 * frequency / N
    pub support: f64,
}

impl FrequencyRecord {
    pub fn new(itemset: Itemset, frequency: usize, num_transactions: usize) -> Self {
        Self {
            itemset,
            frequency,
            support: support_pct(frequency, num_transactions),
        }
    }
}

/// Support in percent. Callers guarantee `num_transactions > 0`.
pub(crate) fn support_pct(count: usize, num_transactions: usize) -> f64 {
    100.0 * count as f64 / num_transactions as f64
}
