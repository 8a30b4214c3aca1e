use ahash::AHashMap;
use anyhow::Result;
use tracing::debug;

use super::store::TransactionStore;
use super::validate_threshold;
use crate::models::frequency::FrequencyRecord;
use crate::models::itemset::Itemset;

/// Count single items and keep those with support >= `min_support`.
///
/// Every token occurrence counts, so a token listed twice in one
/// transaction contributes two.
/// Records come out by descending count, ties in lexical token order.
pub fn count_single_items(
    store: &TransactionStore,
    min_support: f64,
) -> Result<Vec<FrequencyRecord>> {
    validate_threshold("min_support", min_support)?;

    let num_transactions = store.len();
    if num_transactions == 0 {
        return Ok(Vec::new());
    }

    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    for item in store.iter().flat_map(|transaction| transaction.items()) {
        *counts.entry(item.as_str()).or_insert(0) += 1;
    }
    let distinct = counts.len();

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let records: Vec<FrequencyRecord> = ranked
        .into_iter()
        .map(|(item, count)| FrequencyRecord::new(Itemset::new([item]), count, num_transactions))
        .filter(|record| record.support >= min_support)
        .collect();

    debug!(
        transactions = num_transactions,
        distinct_items = distinct,
        frequent_items = records.len(),
        min_support = min_support,
        "single items counted"
    );
    Ok(records)
}
