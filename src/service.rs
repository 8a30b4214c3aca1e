use anyhow::{Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::ErrorKind;
use tracing::{debug, warn};

use crate::config::{Config, MiningConfig};
use crate::engine::compare::{DEFAULT_TOLERANCE, compare_tables};
use crate::engine::store::TransactionStore;
use crate::engine::{MineOptions, mine_with};
use crate::error::{BasketError, ErrorCode};
use crate::models::compare::{ComparisonReport, ReferenceTables};
use crate::models::response::{DatasetInfo, MineResponse};

// ---------------------------------------------------------------------------
// AppService: unified query logic for CLI / Session
// ---------------------------------------------------------------------------

pub struct AppService {
    data_dir: Utf8PathBuf,
    mining: MiningConfig,
}

/// Where a query takes its transactions from.
#[derive(Debug, Clone, Copy)]
pub enum DatasetSource<'a> {
    /// CSV file path
    Path(&'a str),
    /// Dataset name, resolved under the configured data directory
    Named(&'a str),
    /// Transactions already split into items
    Inline(&'a [Vec<String>]),
}

/// Parameters for one mining query. `None` falls back to config.
pub struct QueryParams<'a> {
    pub source: DatasetSource<'a>,
    pub min_support: Option<f64>,
    pub min_confidence: Option<f64>,
    pub items_column: Option<&'a str>,
}

impl AppService {
    pub fn new(config: &Config) -> Result<Self> {
        let data_dir = Utf8PathBuf::from_path_buf(config.data_dir.clone()).map_err(|p| {
            BasketError::new(
                ErrorCode::InvalidRequest,
                format!("data_dir is not valid UTF-8: {}", p.display()),
            )
        })?;
        Ok(Self {
            data_dir,
            mining: config.mining.clone(),
        })
    }

    // -----------------------------------------------------------------------
    // Dataset helpers
    // -----------------------------------------------------------------------

    /// Map a dataset name to `<data_dir>/<name>.csv`.
    fn resolve_dataset(&self, name: &str) -> Result<Utf8PathBuf> {
        let name = name.trim();
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
            warn!(name = name, "resolve_dataset: rejected dataset name");
            bail!(BasketError::new(
                ErrorCode::InvalidRequest,
                format!("Invalid dataset name: \"{name}\""),
            ));
        }
        Ok(self.data_dir.join(format!("{name}.csv")))
    }

    fn read_file(path: &Utf8Path) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                BasketError::file_not_found(path.as_str()).into()
            } else {
                anyhow::Error::new(BasketError::new(
                    ErrorCode::IoError,
                    format!("Failed to read {path}: {e}"),
                ))
            }
        })
    }

    /// Load the transactions for `source` and describe where they came from.
    pub fn load_transactions(
        &self,
        source: DatasetSource<'_>,
        items_column: Option<&str>,
    ) -> Result<(TransactionStore, DatasetInfo)> {
        let path = match source {
            DatasetSource::Inline(lists) => {
                let store = TransactionStore::from_item_lists(lists.to_vec())?;
                let info = DatasetInfo {
                    source: "inline".to_string(),
                    hash: None,
                    transactions: store.len(),
                };
                return Ok((store, info));
            }
            DatasetSource::Path(p) => Utf8PathBuf::from(p),
            DatasetSource::Named(name) => self.resolve_dataset(name)?,
        };

        let bytes = Self::read_file(&path)?;
        let hash = blake3::hash(&bytes).to_hex().to_string();
        let content = std::str::from_utf8(&bytes).map_err(|e| {
            BasketError::new(
                ErrorCode::DataFormat,
                format!("Dataset {path} is not valid UTF-8: {e}"),
            )
        })?;

        let column = items_column.unwrap_or(&self.mining.items_column);
        let store = TransactionStore::from_csv(content, column)?;
        let info = DatasetInfo {
            source: path.into_string(),
            hash: Some(hash),
            transactions: store.len(),
        };
        Ok((store, info))
    }

    fn options(&self, p: &QueryParams<'_>) -> MineOptions {
        MineOptions {
            min_support: p.min_support.unwrap_or(self.mining.min_support),
            min_confidence: p.min_confidence.unwrap_or(self.mining.min_confidence),
            max_frequent_items: self.mining.frequent_item_limit(),
        }
    }

    // -----------------------------------------------------------------------
    // Core operations
    // -----------------------------------------------------------------------

    /// Mine frequent itemsets and rules for one dataset.
    pub fn mine(&self, p: &QueryParams<'_>) -> Result<MineResponse> {
        let options = self.options(p);
        debug!(
            min_support = options.min_support,
            min_confidence = options.min_confidence,
            "mine called"
        );

        let (store, dataset) = self.load_transactions(p.source, p.items_column)?;
        let result = mine_with(&store, &options)?;

        debug!(
            source = dataset.source.as_str(),
            transactions = dataset.transactions,
            frequent_itemsets = result.frequent_itemsets.len(),
            rules = result.rules.len(),
            "mine completed"
        );
        Ok(MineResponse {
            dataset,
            min_support: options.min_support,
            min_confidence: options.min_confidence,
            result,
        })
    }

    /// Mine a dataset and compare the tables with an external miner's output.
    pub fn compare(
        &self,
        p: &QueryParams<'_>,
        reference_path: &str,
        tolerance: Option<f64>,
    ) -> Result<ComparisonReport> {
        let tolerance = tolerance.unwrap_or(DEFAULT_TOLERANCE);
        debug!(
            reference = reference_path,
            tolerance = tolerance,
            "compare called"
        );

        let raw = Self::read_file(Utf8Path::new(reference_path))?;
        let reference: ReferenceTables = serde_json::from_slice(&raw).map_err(|e| {
            BasketError::new(
                ErrorCode::InvalidRequest,
                format!("Invalid reference file {reference_path}: {e}"),
            )
        })?;

        let response = self.mine(p)?;
        let (itemsets, rules) = compare_tables(&response.result, &reference, tolerance)?;
        let agrees = itemsets.is_clean() && rules.is_clean();

        Ok(ComparisonReport {
            dataset: response.dataset,
            min_support: response.min_support,
            min_confidence: response.min_confidence,
            tolerance,
            itemsets,
            rules,
            agrees,
        })
    }
}
