use ahash::{AHashMap, AHashSet};
use anyhow::{Result, bail};
use tracing::debug;

use crate::error::{BasketError, ErrorCode};
use crate::models::compare::{
    ItemsetComparison, ReferenceTables, RuleComparison, RuleKey, ValueMismatch,
};
use crate::models::itemset::Itemset;
use crate::models::response::MiningResult;

/// Default allowed difference, in percentage points.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Convert a 0.0..=1.0 fraction to a percentage.
pub fn fraction_to_pct(fraction: f64) -> f64 {
    fraction * 100.0
}

/// Compare mined tables against an external miner's output.
///
/// Reference values are fractions and are rescaled to percentages first.
/// Engine rules are matched in their conventional direction.
pub fn compare_tables(
    result: &MiningResult,
    reference: &ReferenceTables,
    tolerance: f64,
) -> Result<(ItemsetComparison, RuleComparison)> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        bail!(BasketError::new(
            ErrorCode::InvalidParameter,
            format!("tolerance must be a finite, non-negative number, got {tolerance}"),
        ));
    }
    validate_reference(reference)?;

    let itemsets = compare_itemsets(result, reference, tolerance);
    let rules = compare_rules(result, reference, tolerance);

    debug!(
        itemsets_matched = itemsets.matched,
        itemsets_clean = itemsets.is_clean(),
        rules_matched = rules.matched,
        rules_clean = rules.is_clean(),
        "compare completed"
    );
    Ok((itemsets, rules))
}

fn validate_reference(reference: &ReferenceTables) -> Result<()> {
    let check = |name: &str, key: &dyn std::fmt::Display, value: f64| -> Result<()> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            bail!(BasketError::new(
                ErrorCode::InvalidParameter,
                format!("Reference {name} of {key} must be a fraction in [0, 1], got {value}"),
            ));
        }
        Ok(())
    };

    for entry in &reference.frequent_itemsets {
        check("support", &entry.itemsets, entry.support)?;
    }
    for rule in &reference.rules {
        let key = format!("{} -> {}", rule.antecedents, rule.consequents);
        check("support", &key, rule.support)?;
        check("confidence", &key, rule.confidence)?;
    }
    Ok(())
}

fn compare_itemsets(
    result: &MiningResult,
    reference: &ReferenceTables,
    tolerance: f64,
) -> ItemsetComparison {
    let expected: AHashMap<&Itemset, f64> = reference
        .frequent_itemsets
        .iter()
        .map(|entry| (&entry.itemsets, fraction_to_pct(entry.support)))
        .collect();
    let mined: AHashSet<&Itemset> = result
        .frequent_itemsets
        .iter()
        .map(|record| &record.itemset)
        .collect();

    let mut cmp = ItemsetComparison::default();
    for record in &result.frequent_itemsets {
        match expected.get(&record.itemset) {
            Some(&support) => {
                cmp.matched += 1;
                if (record.support - support).abs() > tolerance {
                    cmp.mismatches.push(ValueMismatch {
                        key: record.itemset.to_string(),
                        field: "support".to_string(),
                        engine: record.support,
                        reference: support,
                    });
                }
            }
            None => cmp.only_in_engine.push(record.itemset.clone()),
        }
    }
    for entry in &reference.frequent_itemsets {
        if !mined.contains(&entry.itemsets) && !cmp.only_in_reference.contains(&entry.itemsets)
        {
            cmp.only_in_reference.push(entry.itemsets.clone());
        }
    }
    cmp
}

fn compare_rules(
    result: &MiningResult,
    reference: &ReferenceTables,
    tolerance: f64,
) -> RuleComparison {
    let expected: AHashMap<RuleKey, (f64, f64)> = reference
        .rules
        .iter()
        .map(|rule| {
            let key = RuleKey {
                antecedent: rule.antecedents.clone(),
                consequent: rule.consequents.clone(),
            };
            let values = (
                fraction_to_pct(rule.confidence),
                fraction_to_pct(rule.support),
            );
            (key, values)
        })
        .collect();

    let mut mined: AHashSet<RuleKey> = AHashSet::with_capacity(result.rules.len());
    let mut cmp = RuleComparison::default();
    for rule in &result.rules {
        let conv = rule.conventional();
        let key = RuleKey {
            antecedent: conv.antecedent,
            consequent: conv.consequent,
        };
        match expected.get(&key) {
            Some(&(confidence, support)) => {
                cmp.matched += 1;
                let label = format!("{} -> {}", key.antecedent, key.consequent);
                if (conv.confidence - confidence).abs() > tolerance {
                    cmp.mismatches.push(ValueMismatch {
                        key: label.clone(),
                        field: "confidence".to_string(),
                        engine: conv.confidence,
                        reference: confidence,
                    });
                }
                if (conv.support - support).abs() > tolerance {
                    cmp.mismatches.push(ValueMismatch {
                        key: label,
                        field: "support".to_string(),
                        engine: conv.support,
                        reference: support,
                    });
                }
            }
            None => cmp.only_in_engine.push(key.clone()),
        }
        mined.insert(key);
    }
    for rule in &reference.rules {
        let key = RuleKey {
            antecedent: rule.antecedents.clone(),
            consequent: rule.consequents.clone(),
        };
        if !mined.contains(&key) && !cmp.only_in_reference.contains(&key) {
            cmp.only_in_reference.push(key);
        }
    }
    cmp
}
