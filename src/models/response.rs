use super::frequency::FrequencyRecord;
use super::rule::Rule;
use serde::{Deserialize, Serialize};

/// The two result tables of one mining query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningResult {
    /// Size-1 records first, then the surviving larger itemsets
    pub frequent_itemsets: Vec<FrequencyRecord>,
    pub rules: Vec<Rule>,
}

/// Where the transactions came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    /// File path, or `"inline"` for session requests carrying transactions
    pub source: String,
    /// BLAKE3 hash of the raw dataset bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    pub transactions: usize,
}

/// The response envelope for the `mine` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineResponse {
    pub dataset: DatasetInfo,
    pub min_support: f64,
    pub min_confidence: f64,
    #[serde(flatten)]
    pub result: MiningResult,
}
