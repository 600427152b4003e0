mod agents;
mod artifacts;
mod cli;
mod config;
mod errors;
mod llm_client;
mod pipeline;
mod routes;
mod service;
mod state;
mod tasks;
mod tools;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agents::{AgentCatalog, AgentExecutor};
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::pipeline::{PipelineRunner, RetryPolicy};
use crate::routes::build_router;
use crate::service::JobSearchService;
use crate::state::AppState;
use crate::tasks::PipelineInputs;
use crate::tools::{ScrapeTool, SearchTool};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Missing API keys fail here, before any stage runs
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobcrew v{}", env!("CARGO_PKG_VERSION"));

    let service = Arc::new(build_service(&config)?);

    match cli.command {
        Some(Command::Run { resume, track }) => run_once(service, resume, track).await,
        Some(Command::Serve { port }) => serve(config, service, port).await,
        None => serve(config, service, None).await,
    }
}

fn build_service(config: &Config) -> Result<JobSearchService> {
    let catalog = AgentCatalog::new(config)?;

    let llm = Arc::new(LlmClient::new(config)?);
    info!("LLM client initialized (model: {})", config.model);

    let search = SearchTool::new(config.serper_api_key.clone(), config.serper_url.clone())?;
    let scrape = ScrapeTool::new()?;
    let executor = Arc::new(AgentExecutor::new(llm, search, scrape));

    let policy = RetryPolicy {
        max_attempts: config.max_attempts,
        delay: config.retry_delay,
    };
    info!(
        "Retry policy: {} attempts, {}s delay, {}s stage timeout",
        policy.max_attempts,
        policy.delay.as_secs(),
        config.stage_timeout.as_secs()
    );
    let runner = PipelineRunner::new(executor, policy, config.stage_timeout);

    Ok(JobSearchService::new(catalog, runner, config.results_dir.clone()))
}

async fn serve(config: Config, service: Arc<JobSearchService>, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.port);
    let state = AppState {
        config: Arc::new(config),
        service,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn run_once(
    service: Arc<JobSearchService>,
    resume: Option<String>,
    track: bool,
) -> Result<()> {
    println!("Welcome to the Job Application Assistant!");

    let criteria = tokio::task::spawn_blocking(|| {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        cli::prompt_criteria(&mut input, &mut output)
    })
    .await
    .context("criteria prompt panicked")??;

    let inputs = PipelineInputs::new(criteria)
        .with_resume_summary(resume.as_deref())
        .with_tracking(track);

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling run");
            ctrl_c.cancel();
        }
    });

    println!("\nStarting job search and application process...\n");
    let outcome = service.run(inputs, cancel).await?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", outcome.text)?;
    match (&outcome.filename, &outcome.warning) {
        (Some(name), _) => writeln!(stdout, "Results saved to: {name}")?,
        (None, Some(warning)) => writeln!(stdout, "Warning: {warning}")?,
        (None, None) => {}
    }

    Ok(())
}
