use anchorwatch::config::{MonitorConfig, OutputFormat};
use anchorwatch::error::ConfigError;
use anchorwatch::monitor;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Print RFC 8145 trust anchor signal queries for DNSKEY and DS records
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Zone files to read; `-` or none reads standard input
    files: Vec<PathBuf>,

    /// Resolver configuration to scan for trust anchors (repeatable)
    #[arg(short = 'c', long = "resolver-config")]
    resolver_configs: Vec<PathBuf>,

    /// Print a JSON report instead of query lines
    #[arg(long)]
    json: bool,

    /// Command printed in front of each signal query name
    #[arg(long)]
    query_command: Option<String>,

    /// Tracing filter, e.g. `debug` or `anchorwatch::zone=trace`
    #[arg(long)]
    log_level: Option<String>,
}

fn load_config(args: &Args) -> Result<MonitorConfig, ConfigError> {
    let mut config = MonitorConfig::from_env()?;
    if let Some(filter) = &args.log_level {
        config.log_filter = filter.clone();
    }
    if let Some(command) = &args.query_command {
        config.query_command = command.clone();
    }
    config
        .resolver_configs
        .extend(args.resolver_configs.iter().cloned());
    if args.json {
        config.output = OutputFormat::Json;
    }
    config.validate()?;
    Ok(config)
}

fn init_logging(filter: &str) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| ConfigError::InvalidLogFilter(format!("{}: {}", filter, e)))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("anchorwatch: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logging(&config.log_filter) {
        eprintln!("anchorwatch: {}", e);
        return ExitCode::FAILURE;
    }
    debug!("Starting with {:?}", config);

    match monitor::run(&args.files, &config) {
        Ok(report) => {
            print!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("anchorwatch: {}", e);
            ExitCode::FAILURE
        }
    }
}
