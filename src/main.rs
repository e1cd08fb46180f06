//! CLI entry point for ttypilot.

mod cli;

use clap::Parser;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use ttypilot::batch::run_batch;
use ttypilot::build_info::cli_version_text;
use ttypilot::config::{
    initialize_default_global_config, load_config_with_diagnostics, Config,
    GlobalConfigInitResult,
};
use ttypilot::error::AppError;
use ttypilot::host::tmux::TmuxHost;
use ttypilot::render::Renderer;
use ttypilot::tools::{build_registry, ToolContext, ToolRegistry};

use cli::Command;

const FALLBACK_LOG_FILTER: &str = "ttypilot=info";

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    let code = run(args).await;
    std::process::exit(code);
}

async fn run(args: cli::Args) -> i32 {
    let renderer = Renderer::new(!args.no_color);

    if args.version {
        println!("{}", cli_version_text());
        return 0;
    }
    let Some(command) = args.command else {
        renderer.error("no subcommand given; run `ttypilot --help`");
        return 2;
    };

    if let Command::Init { force } = command {
        return run_init(&renderer, force);
    }

    let loaded = match load_config_with_diagnostics(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            renderer.error(&AppError::from(e).to_string());
            return 1;
        }
    };
    init_tracing(&loaded.config, !args.no_color);
    for warning in &loaded.diagnostics.warnings {
        warn!(source = ?loaded.source, "{warning}");
    }
    let config = loaded.config;

    // Listing the catalogue does not need a working host.
    let host = if command == Command::Tools {
        TmuxHost::with_binary(config.host.binary.clone())
    } else {
        match TmuxHost::detect(&config.host.binary).await {
            Ok(host) => host,
            Err(e) => {
                renderer.error(&AppError::from(e).to_string());
                return 1;
            }
        }
    };
    let registry = build_registry(ToolContext::from_config(Arc::new(host), &config));

    match command {
        Command::Tools => print_definitions(&renderer, &registry),
        Command::Batch => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            match run_batch(&registry, stdin, tokio::io::stdout()).await {
                Ok(_) => 0,
                Err(e) => {
                    renderer.error(&format!("batch: {e}"));
                    1
                }
            }
        }
        other => match other.tool_call() {
            Some((tool, arguments)) => {
                match registry.execute(&tool, &arguments.to_string()).await {
                    Ok(output) => {
                        println!("{output}");
                        0
                    }
                    Err(e) => {
                        renderer.error(&AppError::from(e).to_string());
                        1
                    }
                }
            }
            None => 0,
        },
    }
}

fn print_definitions(renderer: &Renderer, registry: &ToolRegistry) -> i32 {
    match serde_json::to_string_pretty(&registry.definitions()) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(e) => {
            renderer.error(&format!("failed to encode tool definitions: {e}"));
            1
        }
    }
}

fn run_init(renderer: &Renderer, force: bool) -> i32 {
    match initialize_default_global_config(force) {
        Ok(GlobalConfigInitResult::Created { path }) => {
            renderer.section("config initialized");
            renderer.field("path", &path.display().to_string());
            0
        }
        Ok(GlobalConfigInitResult::Overwritten { path, backup_path }) => {
            renderer.section("config overwritten");
            renderer.field("path", &path.display().to_string());
            renderer.field("backup", &backup_path.display().to_string());
            0
        }
        Ok(GlobalConfigInitResult::AlreadyInitialized { path }) => {
            renderer.warn(&format!(
                "config already exists at {}; use `ttypilot init --force` to overwrite",
                path.display()
            ));
            0
        }
        Err(e) => {
            renderer.error(&AppError::from(e).to_string());
            1
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the configured filter.
fn init_tracing(config: &Config, color: bool) {
    let directive = std::env::var("RUST_LOG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| config.log.filter.clone());
    let filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .init();
}
