use serde::{Deserialize, Serialize};

/// A request to the basket-miner engine (one NDJSON line in session mode).
///
/// The dataset is given by exactly one of `path`, `dataset` or
/// `transactions`. Thresholds fall back to the `[mining]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineRequest {
    pub command: Command,
    /// Path to a CSV dataset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Dataset name, resolved to `<data_dir>/<name>.csv`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    /// Inline transactions, already split into items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_support: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
    /// Name of the CSV column holding the items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_column: Option<String>,
    /// Reference tables file (compare command)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Allowed difference in percentage points (compare command)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Mine,
    Compare,
}
