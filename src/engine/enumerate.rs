use tracing::debug;

use crate::models::frequency::FrequencyRecord;
use crate::models::itemset::Itemset;

/// Every non-empty subset of `items` (2^k - 1 of them).
///
/// Ordered by subset size, then lexically within a size.
pub fn power_set(items: &[&str]) -> Vec<Itemset> {
    let mut sorted = items.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut subsets = Vec::new();
    let mut current = Vec::with_capacity(sorted.len());
    for k in 1..=sorted.len() {
        generate_combinations(&sorted, k, 0, &mut current, &mut |combination| {
            subsets.push(Itemset::new(combination.iter().copied()));
        });
    }
    subsets
}

/// Candidate itemsets of size >= 2 over the frequent single items.
pub fn candidate_itemsets(frequent_singles: &[FrequencyRecord]) -> Vec<Itemset> {
    let tokens: Vec<&str> = frequent_singles
        .iter()
        .filter(|record| record.itemset.len() == 1)
        .flat_map(|record| record.itemset.iter())
        .collect();

    let candidates: Vec<Itemset> = power_set(&tokens)
        .into_iter()
        .filter(|set| set.len() >= 2)
        .collect();

    debug!(
        frequent_items = tokens.len(),
        candidates = candidates.len(),
        "candidate itemsets enumerated"
    );
    candidates
}

fn generate_combinations<'a, F>(
    items: &[&'a str],
    k: usize,
    start: usize,
    current: &mut Vec<&'a str>,
    callback: &mut F,
) where
    F: FnMut(&[&'a str]),
{
    if current.len() == k {
        callback(current);
        return;
    }

    for i in start..items.len() {
        current.push(items[i]);
        generate_combinations(items, k, i + 1, current, callback);
        current.pop();
    }
}
