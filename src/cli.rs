//! CLI definition and dispatch.

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::cache_adapter::CachingDataAdapter;
use crate::adapters::csv_adapter::CsvDataAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::config_validation::{validate_data_config, validate_simulation_config};
use crate::domain::error::SmacrossError;
use crate::domain::indicator::with_moving_averages;
use crate::domain::position::{PositionStatus, StopLossMode};
use crate::domain::simulation::{run_simulation, SimulationParams, SimulationResult};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "smacross", about = "Moving-average crossover strategy simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Csv,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulation over the configured price series
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Validate a simulation configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the available data range for a symbol
    Info {
        #[arg(long)]
        code: Option<String>,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            output,
            code,
            format,
        } => run_simulate(&config, output.as_ref(), code.as_deref(), format),
        Command::Validate { config } => run_validate(&config),
        Command::Info { code, config } => run_info(code.as_deref(), &config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SmacrossError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Read simulation parameters with their defaults. Unrecognized
/// stop-loss mode text becomes `None`; the loop reports it per bar
/// rather than refusing to run.
pub fn build_simulation_params(adapter: &dyn ConfigPort) -> SimulationParams {
    let mode_text = adapter
        .get_string("simulation", "stop_loss_mode")
        .unwrap_or_else(|| "percent".to_string());

    SimulationParams {
        initial_equity: adapter.get_double("simulation", "initial_equity", 1000.0),
        commission_rate: adapter.get_double("simulation", "commission_rate", 0.0039),
        minimum_commission: adapter.get_double("simulation", "minimum_commission", 3.0),
        stop_loss_mode: StopLossMode::parse(&mode_text),
        stop_loss_percent: adapter.get_double("simulation", "stop_loss_percent", 10.0),
        fast_window: adapter.get_int("simulation", "fast_window", 10) as usize,
        slow_window: adapter.get_int("simulation", "slow_window", 30) as usize,
    }
}

pub fn resolve_code(code_override: Option<&str>, config: &dyn ConfigPort) -> Option<String> {
    if let Some(c) = code_override {
        return Some(c.trim().to_uppercase());
    }

    config
        .get_string("data", "code")
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
}

fn build_data_port(config: &dyn ConfigPort, directory: &str) -> Box<dyn DataPort> {
    let csv = CsvDataAdapter::new(PathBuf::from(directory));
    match config.get_string("data", "cache_directory") {
        Some(dir) if !dir.trim().is_empty() => Box::new(CachingDataAdapter::new(
            csv,
            PathBuf::from(dir),
            Local::now().date_naive(),
        )),
        _ => Box::new(csv),
    }
}

fn run_simulate(
    config_path: &PathBuf,
    output_path: Option<&PathBuf>,
    code_override: Option<&str>,
    format: ReportFormat,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Validate simulation and data config
    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_data_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 3: Build parameters and resolve the symbol
    let params = build_simulation_params(&adapter);
    let code = match resolve_code(code_override, &adapter) {
        Some(c) => c,
        None => {
            eprintln!("error: no code configured");
            return ExitCode::from(2);
        }
    };
    let directory = adapter.get_string("data", "directory").unwrap_or_default();

    // Stage 4: Fetch the daily series
    let data_port = build_data_port(&adapter, &directory);
    eprintln!("Loading daily bars for {} from {}", code, directory);
    let bars = match data_port.fetch_daily(&code) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Derive the moving averages
    let signal_bars = with_moving_averages(&bars, params.fast_window, params.slow_window);

    // Stage 6: Run the simulation
    eprintln!("Simulating {} bars for {}...", signal_bars.len(), code);
    let result = run_simulation(&signal_bars, params);

    // Stage 7: Print console summary to stderr
    print_summary(&result);

    // Stage 8: Write the report
    let report: &dyn ReportPort = match format {
        ReportFormat::Text => &TextReportAdapter,
        ReportFormat::Csv => &CsvReportAdapter,
    };

    let written = match output_path {
        Some(path) => fs::File::create(path)
            .map_err(SmacrossError::from)
            .and_then(|mut file| report.write(&result.ledger, &mut file)),
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            report.write(&result.ledger, &mut lock)
        }
    };

    match written {
        Ok(()) => {
            if let Some(path) = output_path {
                eprintln!("\nReport written to: {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            (&e).into()
        }
    }
}

fn print_summary(result: &SimulationResult) {
    eprintln!("\n=== Simulation Summary ===");
    eprintln!(
        "Bars processed:   {} ({} warmup skipped)",
        result.bars_processed, result.bars_skipped
    );
    eprintln!(
        "Trades closed:    {}",
        result.ledger.closed_rows().count()
    );
    eprintln!("Exit signals ignored: {}", result.exit_signals_seen);
    match result.position.status {
        PositionStatus::Open => eprintln!(
            "Open position:    id {} ({} shares)",
            result.position.id, result.position.stocks_number
        ),
        PositionStatus::Flat => eprintln!("Open position:    none"),
    }
    eprintln!("Final equity:     {:.2}", result.account.equity);
    eprintln!("Total result:     {:.2}", result.total_result);

    if !result.conditions.is_empty() {
        eprintln!("\n=== Conditions ===");
        for event in &result.conditions {
            eprintln!("  {}: {}", event.date, event.condition);
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_data_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let params = build_simulation_params(&adapter);

    eprintln!("\nResolved parameters:");
    eprintln!("  initial_equity:     {}", params.initial_equity);
    eprintln!("  commission_rate:    {}", params.commission_rate);
    eprintln!("  minimum_commission: {}", params.minimum_commission);
    let mode = match params.stop_loss_mode {
        Some(StopLossMode::Percent) => "percent",
        Some(StopLossMode::Atr) => "atr",
        None => "unrecognized (stop disabled, reported per bar)",
    };
    eprintln!("  stop_loss_mode:     {}", mode);
    eprintln!("  stop_loss_percent:  {}", params.stop_loss_percent);
    eprintln!("  fast_window:        {}", params.fast_window);
    eprintln!("  slow_window:        {}", params.slow_window);

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(code_override: Option<&str>, config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_data_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let code = match resolve_code(code_override, &adapter) {
        Some(c) => c,
        None => {
            eprintln!("error: no code configured");
            return ExitCode::from(2);
        }
    };
    let directory = adapter.get_string("data", "directory").unwrap_or_default();

    // Info queries the source directly; the cache only matters for runs.
    let data_port = CsvDataAdapter::new(PathBuf::from(&directory));

    match data_port.data_range(&code) {
        Ok(Some((first, last, count))) => {
            println!("{}: {} bars, {} to {}", code, count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", code);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let directory = match adapter.get_string("data", "directory") {
        Some(d) if !d.trim().is_empty() => d,
        _ => {
            eprintln!("error: [data] directory is required for list-symbols");
            return ExitCode::from(2);
        }
    };

    let data_port = CsvDataAdapter::new(PathBuf::from(&directory));
    let symbols = match data_port.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found in {}", directory);
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}
