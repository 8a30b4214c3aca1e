use serde::{Deserialize, Serialize};

use super::itemset::Itemset;

/// A directional relation between two frequent itemsets.
///
/// The antecedent is the larger itemset and the consequent a proper subset
/// of it. Confidence is `100 * support(antecedent) / support(consequent)`,
/// i.e. the share of the consequent's transactions that also hold the rest
/// of the antecedent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    pub confidence: f64,
    /// Support of the antecedent
    pub support: f64,
}

/// The same relation written the textbook way:
/// `confidence(X -> Y) = support(X ∪ Y) / support(X)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConventionalRule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    pub confidence: f64,
    pub support: f64,
}

impl Rule {
    /// Rewrite as `consequent -> (antecedent \ consequent)`.
    ///
    /// The numbers carry over unchanged: the textbook confidence of that
    /// rule is exactly the ratio stored here.
    pub fn conventional(&self) -> ConventionalRule {
        ConventionalRule {
            antecedent: self.consequent.clone(),
            consequent: self.antecedent.difference(&self.consequent),
            confidence: self.confidence,
            support: self.support,
        }
    }
}
