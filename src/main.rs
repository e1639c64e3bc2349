//! Prompt Garden server entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Resolve effective log level (CLI `-v` flags > env > config)
//!   4. Init logger once
//!   5. Build the spreadsheet backend and the garden
//!   6. Run sheet setup when asked (`--setup` or `server.auto_setup`)
//!   7. Spawn Ctrl-C → shutdown signal watcher
//!   8. Serve HTTP until shutdown

use tokio_util::sync::CancellationToken;
use tracing::info;

use prompt_garden::garden::Garden;
use prompt_garden::{config, error, logger, server, sheets};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), error::AppError> {
    // Optional file.
    let _ = dotenvy::dotenv();

    let args = parse_cli_args(std::env::args().skip(1));
    if args.help {
        print_help();
        return Ok(());
    }

    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    let force_cli_level = args.log_level.is_some();
    logger::init(effective_log_level, force_cli_level, config.log_file.as_deref())?;

    info!(
        bind = %config.server.bind,
        backend = %config.sheets.backend,
        configured_log_level = %config.log_level,
        effective_log_level = %effective_log_level,
        "config loaded"
    );

    let backend = sheets::build(&config.sheets, &config.service_account)?;
    let garden = Garden::new(backend, config.sheets.sheet_names.clone());

    if args.setup || config.server.auto_setup {
        garden
            .setup()
            .await
            .map_err(|e| error::AppError::Server(format!("sheet setup failed: {e}")))?;
    }

    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, shutting down");
            ctrlc_token.cancel();
        }
    });

    server::run(
        &config.server.bind,
        config.ui.static_dir.as_deref(),
        garden,
        shutdown,
    )
    .await
}

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
    setup: bool,
    help: bool,
}

fn print_help() {
    println!("Usage: prompt-garden [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -h, --help                 Print help");
    println!("  -f, --config <PATH>        Path to configuration file (default: config/default.toml)");
    println!("  -v, -vv, -vvv              Increase logging verbosity");
    println!("      --setup                Create missing sheets and headers before serving");
}

fn parse_cli_args(args: impl Iterator<Item = String>) -> CliArgs {
    let mut verbosity = 0u8;
    let mut parsed = CliArgs::default();

    let mut iter = args;
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "--setup" => parsed.setup = true,
            "-f" | "--config" => {
                if let Some(path) = iter.next() {
                    parsed.config_path = Some(path);
                } else {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            _ => {}
        }
    }

    //   -v    → info
    //   -vv   → debug  (request routing, sheet reads)
    //   -vvv+ → trace  (request bodies)
    parsed.log_level = match verbosity {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    };

    parsed
}
