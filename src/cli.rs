//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvAdapter, CsvLabelWriter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::barrier::BarrierConfig;
use crate::domain::config_validation::validate_labeling_config;
use crate::domain::error::TribarError;
use crate::domain::label::LabelRecord;
use crate::domain::labeler::{label_series, label_series_par};
use crate::domain::summary::LabelSummary;
use crate::domain::volatility::rolling_volatility;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{DataPort, PriceData};
use crate::ports::label_port::LabelPort;

pub const DEFAULT_HOLDING_PERIOD: i64 = 7;
pub const DEFAULT_VOLATILITY_WINDOW: i64 = 7;

#[derive(Parser, Debug)]
#[command(name = "tribar", about = "Triple-barrier labeling for price series")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Label price series with the triple-barrier method
    Label {
        #[arg(short, long)]
        config: PathBuf,
        /// Symbol to label; all symbols in the data directory when omitted
        #[arg(long)]
        symbol: Option<String>,
        /// Overrides [data] input_dir
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Output CSV file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Evaluate positions on a thread pool
        #[arg(long)]
        parallel: bool,
    },
    /// Validate a labeling configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Label {
            config,
            symbol,
            data_dir,
            output,
            parallel,
        } => run_label(
            &config,
            symbol.as_deref(),
            data_dir.as_deref(),
            output.as_deref(),
            parallel,
        ),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config, data_dir } => {
            run_list_symbols(config.as_deref(), data_dir.as_deref())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TribarError> {
    log::info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

pub fn build_barrier_config(adapter: &dyn ConfigPort) -> Result<BarrierConfig, TribarError> {
    let raw_period = adapter.get_int("labeling", "holding_period", DEFAULT_HOLDING_PERIOD);
    let holding_period = usize::try_from(raw_period).map_err(|_| TribarError::ConfigInvalid {
        section: "labeling".into(),
        key: "holding_period".into(),
        reason: format!("holding_period must be at least 1, got {}", raw_period),
    })?;

    let config = BarrierConfig {
        holding_period,
        profit_mult: adapter.get_double("labeling", "profit_mult", 1.0),
        stop_mult: adapter.get_double("labeling", "stop_mult", 1.0),
        min_ret_threshold: adapter.get_double("labeling", "min_ret_threshold", 0.0),
        apply_min_ret_threshold: adapter.get_bool("labeling", "apply_min_ret_threshold", false),
    };
    config.validate()?;
    Ok(config)
}

pub fn volatility_window(adapter: &dyn ConfigPort) -> Result<usize, TribarError> {
    let raw = adapter.get_int("labeling", "volatility_window", DEFAULT_VOLATILITY_WINDOW);
    usize::try_from(raw)
        .ok()
        .filter(|w| *w >= 2)
        .ok_or_else(|| TribarError::ConfigInvalid {
            section: "labeling".into(),
            key: "volatility_window".into(),
            reason: format!("volatility_window must be at least 2, got {}", raw),
        })
}

/// CLI flag first, then `[data] input_dir`.
pub fn resolve_data_dir(
    data_dir: Option<&Path>,
    adapter: Option<&dyn ConfigPort>,
) -> Result<PathBuf, TribarError> {
    if let Some(dir) = data_dir {
        return Ok(dir.to_path_buf());
    }
    adapter
        .and_then(|a| a.get_string("data", "input_dir"))
        .filter(|s| !s.trim().is_empty())
        .map(|s| PathBuf::from(s.trim()))
        .ok_or_else(|| TribarError::ConfigMissing {
            section: "data".into(),
            key: "input_dir".into(),
        })
}

/// Labels one symbol's data. Uses the volatility column when the source has
/// one, otherwise a rolling volatility of daily returns.
pub fn label_price_data(
    data: &PriceData,
    config: &BarrierConfig,
    vol_window: usize,
    parallel: bool,
) -> Result<Vec<LabelRecord>, TribarError> {
    let computed;
    let volatility = match &data.volatility {
        Some(v) => v,
        None => {
            log::debug!("no volatility column, using rolling window of {}", vol_window);
            computed = rolling_volatility(&data.prices, vol_window)?;
            &computed
        }
    };

    if parallel {
        label_series_par(&data.prices, volatility, config)
    } else {
        label_series(&data.prices, volatility, config)
    }
}

/// Fetches, labels and writes each symbol in order.
///
/// A symbol whose data cannot be read is skipped with a warning; labeling
/// errors abort the run.
pub fn run_label_pipeline(
    data_port: &dyn DataPort,
    sink: &mut dyn LabelPort,
    symbols: &[String],
    config: &BarrierConfig,
    vol_window: usize,
    parallel: bool,
) -> Result<Vec<(String, LabelSummary)>, TribarError> {
    let mut summaries = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        let data = match data_port.fetch_series(symbol) {
            Ok(d) => d,
            Err(e @ TribarError::Data { .. }) => {
                log::warn!("skipping {} ({})", symbol, e);
                continue;
            }
            Err(e) => return Err(e),
        };

        let missing = data.prices.values().iter().filter(|p| p.is_none()).count();
        if missing > 0 {
            log::warn!("{}: {} rows without a close price", symbol, missing);
        }

        let records = label_price_data(&data, config, vol_window, parallel)?;
        sink.write(symbol, &records)?;

        let summary = LabelSummary::compute(&records);
        log::info!(
            "{}: {} rows, {} labeled ({} oversold, {} neutral, {} overbought), win rate {:.1}%",
            symbol,
            summary.total,
            summary.defined(),
            summary.oversold,
            summary.neutral,
            summary.overbought,
            summary.win_rate * 100.0
        );
        log::info!(
            "{}: profit factor {:.2}, avg win {:.2}%, avg loss {:.2}%, expected value {:.3}%, max drawdown {:.1}%",
            symbol,
            summary.profit_factor,
            summary.avg_win * 100.0,
            summary.avg_loss * 100.0,
            summary.expected_value * 100.0,
            summary.max_drawdown * 100.0
        );
        summaries.push((symbol.clone(), summary));
    }

    if summaries.is_empty() {
        return Err(TribarError::Data {
            reason: "no symbols with readable data".into(),
        });
    }
    Ok(summaries)
}

fn run_label(
    config_path: &Path,
    symbol: Option<&str>,
    data_dir: Option<&Path>,
    output: Option<&Path>,
    parallel: bool,
) -> Result<(), TribarError> {
    // Stage 1: Load and validate config
    let adapter = load_config(config_path)?;
    validate_labeling_config(&adapter)?;
    let config = build_barrier_config(&adapter)?;
    let vol_window = volatility_window(&adapter)?;

    // Stage 2: Resolve data source and symbols
    let base = resolve_data_dir(data_dir, Some(&adapter as &dyn ConfigPort))?;
    let data_port = CsvAdapter::new(base);
    let symbols = match symbol {
        Some(s) => vec![s.to_string()],
        None => data_port.list_symbols()?,
    };
    if symbols.is_empty() {
        return Err(TribarError::Data {
            reason: "no symbols found".into(),
        });
    }

    log::info!(
        "Labeling {} symbol(s): holding_period={} profit_mult={} stop_mult={}",
        symbols.len(),
        config.holding_period,
        config.profit_mult,
        config.stop_mult
    );
    if config.apply_min_ret_threshold {
        log::info!(
            "Reclassifying time-limit exits with min_ret_threshold={}",
            config.min_ret_threshold
        );
    }

    // Stage 3: Label and write
    match output {
        Some(path) => {
            let file = File::create(path)?;
            let mut sink = CsvLabelWriter::new(BufWriter::new(file));
            run_label_pipeline(&data_port, &mut sink, &symbols, &config, vol_window, parallel)?;
            log::info!("Labels written to: {}", path.display());
        }
        None => {
            let mut sink = CsvLabelWriter::new(io::stdout().lock());
            run_label_pipeline(&data_port, &mut sink, &symbols, &config, vol_window, parallel)?;
        }
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), TribarError> {
    let adapter = load_config(config_path)?;
    validate_labeling_config(&adapter)?;
    let config = build_barrier_config(&adapter)?;
    volatility_window(&adapter)?;
    log::info!(
        "Config valid: holding_period={} profit_mult={} stop_mult={}",
        config.holding_period,
        config.profit_mult,
        config.stop_mult
    );
    Ok(())
}

fn run_list_symbols(config_path: Option<&Path>, data_dir: Option<&Path>) -> Result<(), TribarError> {
    let adapter = config_path.map(load_config).transpose()?;
    let base = resolve_data_dir(data_dir, adapter.as_ref().map(|a| a as &dyn ConfigPort))?;
    let symbols = CsvAdapter::new(base).list_symbols()?;
    for symbol in &symbols {
        println!("{}", symbol);
    }
    log::info!("{} symbol(s)", symbols.len());
    Ok(())
}
