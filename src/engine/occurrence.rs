use ahash::AHashSet;
use tracing::debug;

use super::store::TransactionStore;
use crate::models::frequency::FrequencyRecord;
use crate::models::itemset::Itemset;

/// Count, for every candidate, the transactions that contain all of its
/// items, and keep the candidates with support >= `min_support`.
///
/// This is the brute-force scan: candidates x transactions subset tests,
/// with no pruning between sizes. At a zero threshold a candidate that
/// never occurs is kept with 0% support.
pub fn count_occurrences(
    store: &TransactionStore,
    candidates: Vec<Itemset>,
    min_support: f64,
) -> Vec<FrequencyRecord> {
    let num_transactions = store.len();
    if num_transactions == 0 {
        return Vec::new();
    }

    let baskets: Vec<AHashSet<&str>> = store
        .iter()
        .map(|transaction| transaction.items().iter().map(String::as_str).collect())
        .collect();

    let scanned = candidates.len();
    let records: Vec<FrequencyRecord> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let count = baskets
                .iter()
                .filter(|basket| candidate.iter().all(|item| basket.contains(item)))
                .count();
            let record = FrequencyRecord::new(candidate, count, num_transactions);
            (record.support >= min_support).then_some(record)
        })
        .collect();

    debug!(
        candidates = scanned,
        transactions = num_transactions,
        frequent = records.len(),
        min_support = min_support,
        "candidate occurrences counted"
    );
    records
}
