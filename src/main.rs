//! ytm4a CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ytm4a::cli::{input, AssumeYes, Cli, Confirm, LineConfirm, Output, Request};
use ytm4a::config::Settings;
use ytm4a::orchestrator::{Orchestrator, Outcome};
use ytm4a::validation::SUPPORTED_FORMATS;
use ytm4a::FetchError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            report(&e);
            let code = e
                .downcast_ref::<FetchError>()
                .map(FetchError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    // Load configuration
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => Settings::load().context("Failed to load configuration")?,
    };

    if let Some(backend) = cli.backend {
        settings.extractor.backend = backend;
    }

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("ytm4a={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let request = match &cli.url {
        Some(url) => Request::from_args(url, cli.output_dir.as_deref(), &settings.output.default_dir),
        None => {
            let stdin = std::io::stdin();
            input::read_interactive(&mut stdin.lock(), &mut std::io::stdout(), &settings.output.default_dir)?
        }
    };

    tracing::debug!(backend = %settings.extractor.backend, "Request: {:?}", request);

    let mut confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(LineConfirm::stdio())
    };

    let orchestrator = Orchestrator::new(&settings);
    let outcome = orchestrator.process(&request, confirm.as_mut()).await?;

    Ok(outcome)
}

/// Print an error with its remediation hint.
fn report(err: &anyhow::Error) {
    let Some(fetch) = err.downcast_ref::<FetchError>() else {
        Output::error(&format!("An unexpected error occurred: {:#}", err));
        Output::info("Please try again or report this issue if it persists.");
        return;
    };

    Output::error(&format!("Error: {}", fetch));

    if let FetchError::InvalidUrlFormat(_) = fetch {
        Output::info("Please provide a valid YouTube video URL.");
        Output::info("Supported formats:");
        for format in SUPPORTED_FORMATS {
            Output::list_item(format);
        }
        return;
    }

    if let Some(hint) = fetch.hint() {
        Output::info(hint);
    }
}
