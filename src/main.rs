//! Limpeza David installer entry point.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use limpeza_installer::cli::Cli;
use limpeza_installer::config::{AppSpec, BootstrapSource, InstallContext, InstallTarget};
use limpeza_installer::fetch::HttpFetcher;
use limpeza_installer::runner::{InstallReport, Orchestrator, RunOptions};
use limpeza_installer::shell::{is_ci, SystemRunner};
use limpeza_installer::ui::{create_ui, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("limpeza_installer=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("limpeza_installer=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli, ui: &mut dyn UserInterface) -> limpeza_installer::Result<InstallReport> {
    let app = AppSpec::default();
    let target = InstallTarget::for_current_user(&app)
        .context("could not determine the home directory")?;
    let ctx = InstallContext::builder(target)
        .app(app)
        .repo_url(cli.repo_url.as_str())
        .bootstrap(BootstrapSource {
            url: cli.bootstrap_url.clone(),
            enabled: !cli.no_bootstrap_script,
        })
        .build();
    tracing::debug!("Install context: {:?}", ctx);

    let runner = SystemRunner::with_search_path(ctx.search_path.clone());
    let downloader = HttpFetcher::new()?;

    Orchestrator::new(&ctx, &runner, &downloader, RunOptions::new(cli.launch_policy())).run(ui)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Installer starting with args: {:?}", cli);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let is_interactive = !cli.json && !is_ci() && console::user_attended();
    let mut ui = create_ui(is_interactive, cli.output_mode());

    let result = run(&cli, ui.as_mut());

    if cli.json {
        let value = match &result {
            Ok(report) => serde_json::to_value(report),
            Err(e) => Ok(serde_json::json!({ "error": e.to_string() })),
        };
        match value.and_then(|v| serde_json::to_string_pretty(&v)) {
            Ok(text) => println!("{}", text),
            Err(e) => tracing::error!("Could not serialize report: {}", e),
        }
    }

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
