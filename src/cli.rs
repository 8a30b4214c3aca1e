use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "basket-miner",
    version,
    about = "Brute-force frequent itemset and association rule mining CLI"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Pretty-print JSON output (default: compact)
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,
}

/// Dataset selection and thresholds shared by `mine` and `compare`.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Path to a CSV dataset (single mode)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Dataset name, resolved to <data_dir>/<NAME>.csv
    #[arg(short, long, conflicts_with = "input")]
    pub dataset: Option<String>,

    /// Minimum support, percent of transactions (default: from config)
    #[arg(short = 's', long, allow_negative_numbers = true)]
    pub min_support: Option<f64>,

    /// Minimum confidence, percent (default: from config)
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    pub min_confidence: Option<f64>,

    /// CSV column holding the items (default: from config)
    #[arg(long)]
    pub items_column: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mine frequent itemsets and association rules
    Mine {
        #[command(flatten)]
        query: QueryArgs,

        /// Comma-separated CSV paths (batch mode, NDJSON output)
        #[arg(long, conflicts_with_all = ["input", "dataset"])]
        inputs: Option<String>,

        /// File containing CSV paths, one per line (batch mode)
        #[arg(long, conflicts_with_all = ["input", "dataset", "inputs"])]
        inputs_file: Option<String>,
    },

    /// Mine a dataset and compare the tables with another miner's output
    Compare {
        #[command(flatten)]
        query: QueryArgs,

        /// JSON file with `frequent_itemsets` and `rules` (fractions in 0..1)
        #[arg(short, long)]
        reference: String,

        /// Allowed difference in percentage points
        #[arg(short, long)]
        tolerance: Option<f64>,
    },

    /// Start NDJSON streaming session (stdin → stdout)
    Session,

    /// Generate default configuration file
    Init {
        /// Path to write the configuration file (default: ~/.config/basket-miner/config.toml)
        #[arg(long)]
        path: Option<std::path::PathBuf>,
    },
}
