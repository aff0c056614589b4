//! rtdist - Fetch and unpack runtime distributions for application packaging
//!
//! Loads configuration, runs the requested acquisition through the unpack
//! crate and renders its events while it runs.

mod cli;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands, UnpackArgs};
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use rtdist_config::Config;
use rtdist_events::EventReceiver;
use rtdist_unpack::{Packager, PackagingContext, Unpacker};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use tokio::select;
use tracing::{error, info};

/// Summary printed once a command succeeds
#[derive(Debug, Serialize)]
struct UnpackSummary {
    variant: &'static str,
    platform: String,
    arch: String,
    version: String,
    output_dir: PathBuf,
    copied_from: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if json_mode {
            let body = serde_json::json!({
                "error": e.to_string(),
                "code": e.code(),
            });
            println!("{body}");
        } else {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting rtdist v{}", env!("CARGO_PKG_VERSION"));

    // Precedence: file (or defaults) < environment < CLI flags
    let mut config = Config::load_or_default(cli.global.config.as_deref())
        .await
        .map_err(CliError::Config)?;
    config.merge_env().map_err(CliError::Config)?;
    apply_cli_config(&mut config, &cli.command)?;

    let (event_sender, event_receiver) = rtdist_events::channel();
    let unpacker = Unpacker::from_config(&config, Some(event_sender))?;

    let colors_enabled = console::Term::stderr().features().colors_supported();
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.json);

    let summary = execute_command_with_events(
        cli.command,
        config,
        unpacker,
        event_receiver,
        &mut event_handler,
    )
    .await?;

    render_summary(&summary, cli.global.json)?;
    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    config: Config,
    unpacker: Unpacker,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<UnpackSummary, CliError> {
    let mut command_future = Box::pin(execute_command(command, config, unpacker));

    loop {
        select! {
            result = &mut command_future => {
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            event = event_receiver.recv() => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => { /* Channel closed: keep waiting for command to finish */ }
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    config: Config,
    unpacker: Unpacker,
) -> Result<UnpackSummary, CliError> {
    match command {
        Commands::Unpack(args) => unpack(args, config, &unpacker).await,
    }
}

async fn unpack(
    args: UnpackArgs,
    config: Config,
    unpacker: &Unpacker,
) -> Result<UnpackSummary, CliError> {
    let project_dir = match args.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let mut packager = Packager::new(config, project_dir, args.platform.clone());
    if let Some(name) = args.bundle_name {
        packager = packager.with_bundle_name(name);
    }
    let copied_from = packager
        .config()
        .dist_dir
        .as_deref()
        .map(|dist| packager.dist_source_dir(dist));

    if args.fork {
        unpacker
            .unpack_fork(
                &packager,
                &args.out,
                &args.platform,
                &args.arch,
                &args.runtime_version,
            )
            .await?;
    } else {
        unpacker
            .unpack_standard(
                &packager,
                &args.out,
                &args.platform,
                &args.arch,
                &args.runtime_version,
            )
            .await?;
    }

    Ok(UnpackSummary {
        variant: if args.fork { "fork" } else { "standard" },
        platform: args.platform,
        arch: args.arch,
        version: args.runtime_version,
        output_dir: args.out,
        copied_from,
    })
}

fn render_summary(summary: &UnpackSummary, json: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if json {
        let body = serde_json::to_string_pretty(summary)
            .map_err(|e| CliError::Unpack(e.into()))?;
        writeln!(stdout, "{body}")?;
    } else {
        writeln!(
            stdout,
            "Unpacked {} distribution v{} ({}-{}) into {}",
            summary.variant,
            summary.version,
            summary.platform,
            summary.arch,
            summary.output_dir.display()
        )?;
    }
    Ok(())
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, command: &Commands) -> Result<(), CliError> {
    match command {
        Commands::Unpack(args) => {
            if args.runtime_version.trim().is_empty() {
                return Err(CliError::InvalidArguments(
                    "--version must not be empty".to_string(),
                ));
            }
            if let Some(version) = args.runtime_version.strip_prefix('v') {
                return Err(CliError::InvalidArguments(format!(
                    "--version takes the bare version, try --version {version}"
                )));
            }
            if let Some(dist_dir) = &args.dist_dir {
                config.dist_dir = Some(dist_dir.clone());
            }
            if let Some(cache) = &args.cache {
                config.cache = Some(cache.clone());
            }
        }
    }
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        // Debug mode: structured JSON logs to file
        let log_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("rtdist")
            .join("logs");
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            if !json_mode {
                eprintln!("Warning: Failed to create log directory: {e}");
            }
        }

        let log_file = log_dir.join(format!(
            "rtdist-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                            |_| tracing_subscriber::EnvFilter::new("info,rtdist=debug"),
                        ),
                    )
                    .init();

                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                if !json_mode {
                    eprintln!("Warning: Failed to create log file: {e}");
                }
            }
        }
    }

    if json_mode {
        // JSON mode: keep stdout and stderr free of log lines
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
            )
            .init();
    }
}
