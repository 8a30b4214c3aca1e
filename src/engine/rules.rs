use anyhow::{Result, bail};
use tracing::debug;

use super::validate_threshold;
use crate::error::BasketError;
use crate::models::frequency::FrequencyRecord;
use crate::models::rule::Rule;

/// Derive rules from every (antecedent, consequent) pair of frequent
/// itemsets where the consequent is a proper subset of the antecedent.
///
/// `confidence = 100 * support(antecedent) / support(consequent)`. Pairs
/// below `min_confidence` are dropped. Rows follow the order of
/// `frequent`, antecedent first.
pub fn generate_rules(frequent: &[FrequencyRecord], min_confidence: f64) -> Result<Vec<Rule>> {
    validate_threshold("min_confidence", min_confidence)?;

    let mut rules = Vec::new();
    let mut pairs = 0usize;
    for antecedent in frequent {
        for consequent in frequent {
            if !consequent.itemset.is_proper_subset_of(&antecedent.itemset) {
                continue;
            }
            pairs += 1;

            let confidence = confidence_pct(antecedent, consequent)?;
            if confidence >= min_confidence {
                rules.push(Rule {
                    antecedent: antecedent.itemset.clone(),
                    consequent: consequent.itemset.clone(),
                    confidence,
                    support: antecedent.support,
                });
            }
        }
    }

    debug!(
        itemsets = frequent.len(),
        pairs = pairs,
        rules = rules.len(),
        min_confidence = min_confidence,
        "rules generated"
    );
    Ok(rules)
}

fn confidence_pct(antecedent: &FrequencyRecord, consequent: &FrequencyRecord) -> Result<f64> {
    if consequent.itemset.is_empty() || consequent.support.is_nan() || consequent.support <= 0.0 {
        bail!(BasketError::degenerate_rule(
            &antecedent.itemset,
            &consequent.itemset
        ));
    }
    Ok(100.0 * antecedent.support / consequent.support)
}
