pub mod compare;
pub mod enumerate;
pub mod frequency;
pub mod occurrence;
pub mod rules;
pub mod store;

use anyhow::{Result, bail};
use tracing::debug;

use crate::error::{BasketError, ErrorCode};
use crate::models::response::MiningResult;
use store::TransactionStore;

/// Thresholds and limits for one mining query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MineOptions {
    /// Percentage of transactions, 0 to 100
    pub min_support: f64,
    /// Percentage, 0 to 100
    pub min_confidence: f64,
    /// Reject the query when more single items than this are frequent.
    /// The candidate count grows as 2^k, so this bounds memory.
    pub max_frequent_items: Option<usize>,
}

impl MineOptions {
    pub fn new(min_support: f64, min_confidence: f64) -> Self {
        Self {
            min_support,
            min_confidence,
            max_frequent_items: None,
        }
    }
}

/// Mine frequent itemsets and rules from `store`.
///
/// Both thresholds are percentages and are validated before any counting.
pub fn mine(store: &TransactionStore, min_support: f64, min_confidence: f64) -> Result<MiningResult> {
    mine_with(store, &MineOptions::new(min_support, min_confidence))
}

pub fn mine_with(store: &TransactionStore, options: &MineOptions) -> Result<MiningResult> {
    validate_threshold("min_support", options.min_support)?;
    validate_threshold("min_confidence", options.min_confidence)?;

    let singles = frequency::count_single_items(store, options.min_support)?;
    if let Some(limit) = options.max_frequent_items
        && singles.len() > limit
    {
        bail!(BasketError::new(
            ErrorCode::CandidateLimit,
            format!(
                "{} frequent items exceed the limit of {limit}; raise min_support or max_frequent_items",
                singles.len()
            ),
        ));
    }

    let candidates = enumerate::candidate_itemsets(&singles);
    let larger = occurrence::count_occurrences(store, candidates, options.min_support);

    let mut frequent_itemsets = singles;
    frequent_itemsets.extend(larger);

    let rules = rules::generate_rules(&frequent_itemsets, options.min_confidence)?;

    debug!(
        transactions = store.len(),
        frequent_itemsets = frequent_itemsets.len(),
        rules = rules.len(),
        "mine completed"
    );
    Ok(MiningResult {
        frequent_itemsets,
        rules,
    })
}

/// Thresholds are percentages: finite and within [0, 100].
pub fn validate_threshold(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        bail!(BasketError::invalid_parameter(name, value));
    }
    Ok(())
}
