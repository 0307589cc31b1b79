//! pd-core - log user rows with PII redacted.
//!
//! Reads rows (one JSON object per line) or ready-made `key=value;` messages
//! from a file or stdin and logs each one through the redacting logger on
//! stderr.

use clap::Parser;
use pd_core::logging::{LogConfig, LogFormat, LogLevel};
use pd_core::{get_logger_with, init_logging, log_rows, ExitCode, JsonRowReader, Result};
use pd_redact::RedactionConfig;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

/// Log user rows with personal data redacted
#[derive(Parser, Debug)]
#[command(name = "pd-core")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read input from this file instead of stdin
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Treat each input line as a log message rather than a JSON row
    #[arg(long)]
    raw: bool,

    /// Redaction config file (JSON)
    #[arg(long, env = "PD_REDACT_CONFIG")]
    config: Option<PathBuf>,

    /// Comma-separated field names to redact (overrides the config file)
    #[arg(long, value_delimiter = ',', env = "PD_REDACT_FIELDS")]
    fields: Option<Vec<String>>,

    /// Tag printed at the start of each line
    #[arg(long)]
    tag: Option<String>,

    /// Minimum level to emit
    #[arg(long)]
    log_level: Option<LogLevel>,

    /// Output format (human or jsonl)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match run(&cli) {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            eprintln!("pd-core: {}", err);
            ExitCode::from(&err)
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;
    init_logging(&config)?;

    let logger = get_logger_with(&config, io::stderr())?;
    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };

    if cli.raw {
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                logger.info(line);
            }
        }
        return Ok(());
    }

    let mut failure = None;
    let rows = JsonRowReader::new(reader).map_while(|row| row.map_err(|e| failure = Some(e)).ok());
    let count = log_rows(&logger, rows);

    match failure {
        Some(err) => {
            tracing::debug!(target: "pd_core::cli", count, "stopped at invalid input");
            Err(err)
        }
        None => Ok(()),
    }
}

fn build_config(cli: &Cli) -> Result<LogConfig> {
    let mut config = LogConfig::from_env(cli.log_level, cli.log_format);

    if let Some(path) = &cli.config {
        config.redaction = RedactionConfig::load(path)?;
    }
    if let Some(fields) = &cli.fields {
        config.redaction.fields = fields.clone();
    }
    if let Some(tag) = &cli.tag {
        config.tag = tag.clone();
    }

    Ok(config)
}
