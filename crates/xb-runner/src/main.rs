//! # xb-runner
//!
//! Command-line front end for the XBridge record logs.
//!
//! Loads a node settings file, installs the process `LOG` and `TXLOG`
//! loggers, writes one record and prints the file it went to. Handy for
//! checking a deployment's log layout and for scripting operational notes
//! into the same files the node writes.
//!
//! # Usage
//!
//! ```bash
//! xb-runner xbridge.json --reason e connection lost to 10.0.0.7
//! xb-runner xbridge.json --tx order 1f3a committed
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use xb_log::{
    AnnotatedLogger, NullNotifier, TransactionLogger,
    config::load_config,
    global::{self, install_log, install_txlog},
    txlog, xlog,
};

/// XBridge record log writer.
#[derive(Parser)]
#[command(name = "xb-runner", about = "Write a record to the XBridge LOG or TXLOG files")]
struct Cli {
    /// Configuration file path (JSON).
    config: PathBuf,

    /// Diagnostics level (trace, debug, info, warn, error); overrides the config file.
    #[arg(short, long)]
    log_level: Option<String>,

    /// Optional directory for diagnostics file output.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Write to the transaction log instead of the general log.
    #[arg(long)]
    tx: bool,

    /// Reason code for general log records.
    #[arg(short, long, default_value_t = 'i')]
    reason: char,

    /// Record text.
    #[arg(required = true)]
    message: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let config = Arc::new(load_config(&cli.config)?);

    // 2. Initialize diagnostics
    let level = cli.log_level.clone().or_else(|| config.log_level()).unwrap_or_else(|| "info".to_owned());
    xb_log::logging::init_logging(&level, cli.log_dir.as_deref(), &config.module_name())?;
    info!("xb-runner starting — config={}, log_level={level}", cli.config.display());

    // 3. Install the record loggers
    install_log(AnnotatedLogger::from_config(config.clone(), Arc::new(NullNotifier)))?;
    install_txlog(TransactionLogger::from_config(config))?;

    // 4. Write the record
    let text = cli.message.join(" ");
    let (path, failed) = if cli.tx {
        txlog!("{text}");
        // Terminate the stdout echo of the record.
        println!();
        let failed = global::txlog_instance().map_or(0, TransactionLogger::failed_flushes);
        (global::txlog_file_name(), failed)
    } else {
        xlog!(cli.reason, "{text}");
        let failed = global::log_instance().map_or(0, AnnotatedLogger::failed_flushes);
        (global::log_file_name(), failed)
    };

    if failed > 0 {
        warn!("record could not be written to {path}");
    } else {
        info!("record written to {path}");
    }
    println!("{path}");
    Ok(())
}
