use serde::{Deserialize, Serialize};

use super::itemset::Itemset;
use super::response::DatasetInfo;

/// Output of an external miner (Apriori / FP-Growth), in fractional units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceTables {
    #[serde(default)]
    pub frequent_itemsets: Vec<ReferenceItemset>,
    #[serde(default)]
    pub rules: Vec<ReferenceRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceItemset {
    #[serde(alias = "itemset")]
    pub itemsets: Itemset,
    /// Fraction of transactions (0.0 to 1.0)
    pub support: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceRule {
    #[serde(alias = "antecedent")]
    pub antecedents: Itemset,
    #[serde(alias = "consequent")]
    pub consequents: Itemset,
    /// Fraction of transactions holding antecedents ∪ consequents
    pub support: f64,
    /// support(antecedents ∪ consequents) / support(antecedents)
    pub confidence: f64,
}

/// Rule identity in the conventional direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleKey {
    pub antecedent: Itemset,
    pub consequent: Itemset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueMismatch {
    pub key: String,
    pub field: String,
    pub engine: f64,
    pub reference: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsetComparison {
    pub matched: usize,
    pub only_in_engine: Vec<Itemset>,
    pub only_in_reference: Vec<Itemset>,
    pub mismatches: Vec<ValueMismatch>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleComparison {
    pub matched: usize,
    pub only_in_engine: Vec<RuleKey>,
    pub only_in_reference: Vec<RuleKey>,
    pub mismatches: Vec<ValueMismatch>,
}

/// Result of the `compare` command. Percentages throughout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub dataset: DatasetInfo,
    pub min_support: f64,
    pub min_confidence: f64,
    pub tolerance: f64,
    pub itemsets: ItemsetComparison,
    pub rules: RuleComparison,
    pub agrees: bool,
}

impl ItemsetComparison {
    pub fn is_clean(&self) -> bool {
        self.only_in_engine.is_empty()
            && self.only_in_reference.is_empty()
            && self.mismatches.is_empty()
    }
}

impl RuleComparison {
    pub fn is_clean(&self) -> bool {
        self.only_in_engine.is_empty()
            && self.only_in_reference.is_empty()
            && self.mismatches.is_empty()
    }
}
