use std::process;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::runtime::Runtime;

use daybatch_uploader::cli::{Args, Commands};
use daybatch_uploader::cloud::sink::DryRunSink;
use daybatch_uploader::config::{load_config, UploadConfig};
use daybatch_uploader::models::RunReport;
use daybatch_uploader::security::safe_error_message;
use daybatch_uploader::transfer;
use daybatch_uploader::utils::summary;

fn main() {
    // Parse arguments
    let args = Args::parse();

    if let Err(e) = run(&args) {
        let message = safe_error_message(&e);
        if log::max_level() >= LevelFilter::Error {
            error!("{}", message);
        } else {
            eprintln!("Error: {}", message);
        }
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    // Initialize logging
    initialize_logging(args.verbose)?;

    // Handle subcommands
    if let Some(cmd) = &args.command {
        return handle_subcommand(cmd);
    }

    // Load configuration, CLI flags win over the file
    let mut config = load_config(args.config.as_deref())?;
    args.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    info!(
        "Uploading {} files from {} to container {}",
        config.suffix,
        config.root.display(),
        config.container
    );

    let runtime = Runtime::new().context("Failed to create Tokio runtime")?;
    let report = runtime
        .block_on(upload(&config, args.dry_run))
        .context("Upload run failed")?;

    if let Some(path) = &args.summary {
        summary::write_run_summary(path, &config, &report, args.dry_run)?;
    }

    if !report.is_success() {
        return Err(anyhow!(
            "{} of {} files failed to upload",
            report.failed_count(),
            report.files.len()
        ));
    }

    Ok(())
}

async fn upload(config: &UploadConfig, dry_run: bool) -> Result<RunReport> {
    let report = if dry_run {
        info!("Dry run: files are read but not uploaded");
        let sink = DryRunSink::new(&config.container);
        transfer::run_with_sink(config, &sink).await?
    } else {
        transfer::run(config).await?
    };
    Ok(report)
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

/// Handle the init-config subcommand
fn handle_subcommand(cmd: &Commands) -> Result<()> {
    match cmd {
        Commands::InitConfig { path } => {
            info!("Creating default configuration file at {}", path.display());
            UploadConfig::create_default_config_file(path)?;
            info!("Configuration created successfully");
            Ok(())
        }
    }
}
