//! Interactive inputs portal entry point.
//!
//! Binary name: `interactive-inputs`
//!
//! Validates the configuration, verifies notifiers, serves the input form
//! until it is submitted, cancelled or times out, and exits 0 only when the
//! inputs were submitted.

mod cli;
mod config;
mod http;
mod render;
mod server;
mod state;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use portal_core::output::OutputSink;
use portal_core::session::SessionOrchestrator;
use portal_infra::filesystem::LocalCacheFs;
use portal_infra::notifier::build_notifier_set;
use portal_infra::output::{GithubOutputFile, LogOutputSink, OUTPUT_FILE_ENV};
use portal_infra::run_context::run_context_from_env;
use portal_types::error::SessionError;
use portal_types::session::SessionResult;

use cli::Cli;
use config::PortalConfig;
use render::BasicFormRenderer;
use server::AxumPortalLauncher;
use state::PortalPresentation;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = portal_observe::init_tracing(cli.verbose, cli.otel) {
        eprintln!("Warning: unable to initialize logging: {e}");
    }

    let code = match run(cli).await {
        Ok(result) => report_result(&result),
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    };

    portal_observe::shutdown_tracing();
    code
}

async fn run(cli: Cli) -> anyhow::Result<SessionResult> {
    let config = PortalConfig::from_cli(cli)?;
    let settings = config.session_settings();
    print_banner(&config);

    let PortalConfig {
        title,
        schema,
        timeout_secs,
        slack,
        discord,
        listen,
        static_dir,
        max_upload_bytes,
        termination,
        ..
    } = config;

    let run = run_context_from_env();
    let notifiers = build_notifier_set(slack, discord, &run);

    let output: Arc<dyn OutputSink> = if listen.is_local() {
        tracing::info!("Running locally, submitted values are only logged");
        Arc::new(LogOutputSink)
    } else {
        match GithubOutputFile::from_env() {
            Some(file) => Arc::new(file),
            None => {
                tracing::warn!(env = OUTPUT_FILE_ENV, "Output file not set, submitted values are only logged");
                Arc::new(LogOutputSink)
            }
        }
    };

    let presentation = PortalPresentation {
        title,
        timeout_secs,
        run,
        output,
        renderer: Arc::new(BasicFormRenderer),
        termination,
    };
    let launcher = AxumPortalLauncher::new(listen, presentation, static_dir, max_upload_bytes)
        .with_signal_handling();

    let orchestrator =
        SessionOrchestrator::new(settings, schema, notifiers, LocalCacheFs::new(), launcher);

    Ok(orchestrator.run().await?)
}

fn print_banner(config: &PortalConfig) {
    println!();
    println!(
        "  {} {}",
        console::style("⚡").bold(),
        console::style(config.title.as_deref().unwrap_or("Interactive Inputs")).cyan().bold()
    );
    println!(
        "  {}",
        console::style(format!(
            "{} field(s), expires in {}",
            config.schema.len(),
            render::format_timeout(config.timeout_secs)
        ))
        .dim()
    );
    println!();
}

fn report_result(result: &SessionResult) -> ExitCode {
    if result.is_success() {
        println!("  {} {}", console::style("✓").green().bold(), result.detail);
    } else {
        eprintln!(
            "  {} {} ({})",
            console::style("✗").red().bold(),
            result.detail,
            console::style(result.outcome).dim()
        );
    }
    ExitCode::from(result.exit_code())
}

fn report_error(err: &anyhow::Error) {
    let category = err
        .downcast_ref::<SessionError>()
        .map(SessionError::category)
        .unwrap_or("internal");
    tracing::error!(category, error = %err, "Portal aborted");
    eprintln!(
        "  {} {} {}",
        console::style("✗").red().bold(),
        console::style(format!("[{category}]")).red(),
        err
    );
}
