use anyhow::Result;
use clap::Parser;

use basket_miner::cli::{Cli, Commands, QueryArgs};
use basket_miner::config::ConfigService;
use basket_miner::error::{BasketError, ErrorCode, error_value};
use basket_miner::models::request::{Command, MineRequest};
use basket_miner::service::{AppService, DatasetSource, QueryParams};
use basket_miner::session;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

#[cfg(not(feature = "dhat-heap"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        println!("{}", make_error_line(&e));
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn serialize_output(value: &impl serde::Serialize, pretty: bool) -> Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

fn make_error_line(e: &anyhow::Error) -> String {
    error_value(e).to_string()
}

fn invalid_request(message: impl Into<String>) -> anyhow::Error {
    BasketError::new(ErrorCode::InvalidRequest, message).into()
}

enum InputSet<'a> {
    Single(DatasetSource<'a>),
    Batch(Vec<String>),
}

fn resolve_inputs<'a>(
    query: &'a QueryArgs,
    inputs: Option<&str>,
    inputs_file: Option<&str>,
) -> Result<InputSet<'a>> {
    if let Some(list) = inputs {
        let paths = list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Ok(InputSet::Batch(paths))
    } else if let Some(file) = inputs_file {
        let content = std::fs::read_to_string(file).map_err(|e| {
            BasketError::new(ErrorCode::IoError, format!("Failed to read {file}: {e}"))
        })?;
        let paths = content
            .lines()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Ok(InputSet::Batch(paths))
    } else {
        Ok(InputSet::Single(single_source(query)?))
    }
}

fn single_source(query: &QueryArgs) -> Result<DatasetSource<'_>> {
    match (&query.input, &query.dataset) {
        (Some(path), _) => Ok(DatasetSource::Path(path)),
        (None, Some(name)) => Ok(DatasetSource::Named(name)),
        (None, None) => Err(invalid_request("One of --input or --dataset is required")),
    }
}

fn query_params<'a>(query: &'a QueryArgs, source: DatasetSource<'a>) -> QueryParams<'a> {
    QueryParams {
        source,
        min_support: query.min_support,
        min_confidence: query.min_confidence,
        items_column: query.items_column.as_deref(),
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

fn run(cli: Cli) -> Result<()> {
    let pretty = cli.pretty;

    // Load configuration
    let config = ConfigService::load(cli.config.as_deref())?;

    // Initialize logging if debug mode (CLI flag or config)
    let _log_guard = if cli.debug || config.debug {
        Some(basket_miner::logger::init(&config)?)
    } else {
        None
    };

    // Handle early-exit commands before creating AppService
    if let Commands::Init { path } = &cli.command {
        let config_path = if let Some(p) = path {
            ConfigService::generate_at(p)?;
            p.clone()
        } else {
            ConfigService::generate_default()?;
            ConfigService::default_path()
        };
        eprintln!("Configuration file created at: {}", config_path.display());
        return Ok(());
    }

    let service = AppService::new(&config)?;

    match cli.command {
        Commands::Mine {
            query,
            inputs,
            inputs_file,
        } => match resolve_inputs(&query, inputs.as_deref(), inputs_file.as_deref())? {
            InputSet::Single(source) => cmd_mine(&service, &query_params(&query, source), pretty),
            InputSet::Batch(paths) => batch_mine(&service, &query, &paths),
        },
        Commands::Compare {
            query,
            reference,
            tolerance,
        } => {
            let params = query_params(&query, single_source(&query)?);
            cmd_compare(&service, &params, &reference, tolerance, pretty)
        }
        Commands::Session => cmd_session(&service),
        Commands::Init { .. } => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_mine(service: &AppService, params: &QueryParams<'_>, pretty: bool) -> Result<()> {
    let response = service.mine(params)?;
    let output = serialize_output(&response, pretty)?;
    println!("{output}");
    Ok(())
}

fn cmd_compare(
    service: &AppService,
    params: &QueryParams<'_>,
    reference: &str,
    tolerance: Option<f64>,
    pretty: bool,
) -> Result<()> {
    let report = service.compare(params, reference, tolerance)?;
    let output = serialize_output(&report, pretty)?;
    println!("{output}");
    Ok(())
}

fn cmd_session(service: &AppService) -> Result<()> {
    session::run_session(|req| handle_request(service, req))
}

// ---------------------------------------------------------------------------
// Batch processing (NDJSON output, one dataset at a time)
// ---------------------------------------------------------------------------

fn batch_mine(service: &AppService, query: &QueryArgs, paths: &[String]) -> Result<()> {
    for p in paths {
        let params = query_params(query, DatasetSource::Path(p));
        let line = match service.mine(&params) {
            Ok(response) => {
                serde_json::to_string(&response).unwrap_or_else(|e| make_error_line(&e.into()))
            }
            Err(e) => make_error_line(&e),
        };
        println!("{line}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Session handler
// ---------------------------------------------------------------------------

fn request_source(req: &MineRequest) -> Result<DatasetSource<'_>> {
    match (&req.path, &req.dataset, &req.transactions) {
        (Some(path), None, None) => Ok(DatasetSource::Path(path)),
        (None, Some(name), None) => Ok(DatasetSource::Named(name)),
        (None, None, Some(lists)) => Ok(DatasetSource::Inline(lists)),
        (None, None, None) => Err(invalid_request(
            "One of \"path\", \"dataset\" or \"transactions\" is required",
        )),
        _ => Err(invalid_request(
            "Only one of \"path\", \"dataset\" or \"transactions\" may be given",
        )),
    }
}

fn handle_request(service: &AppService, req: MineRequest) -> Result<serde_json::Value> {
    let params = QueryParams {
        source: request_source(&req)?,
        min_support: req.min_support,
        min_confidence: req.min_confidence,
        items_column: req.items_column.as_deref(),
    };

    match req.command {
        Command::Mine => {
            let response = service.mine(&params)?;
            Ok(serde_json::to_value(response)?)
        }
        Command::Compare => {
            let reference = req
                .reference
                .as_deref()
                .ok_or_else(|| invalid_request("\"reference\" is required for compare"))?;
            let report = service.compare(&params, reference, req.tolerance)?;
            Ok(serde_json::to_value(report)?)
        }
    }
}
