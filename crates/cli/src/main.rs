//! `twin` -- command-line capture client for the reconstruction service.
//!
//! Loads the role photos and measurements given on the command line into
//! a capture session, runs one workflow against the service and prints
//! the QA panel, status banner and log. A generated model is saved to the
//! download directory.
//!
//! # Environment variables
//!
//! | Variable             | Required | Default     | Description                              |
//! |----------------------|----------|-------------|------------------------------------------|
//! | `TWIN_ENDPOINT`      | yes*     | --          | Sync run URL of the reconstruction service |
//! | `TWIN_API_TOKEN`     | no       | --          | Bearer token for the service             |
//! | `TWIN_EXPECTED_HOST` | no       | `runpod.ai` | Only this host receives the token        |
//! | `TWIN_DOWNLOAD_DIR`  | no       | `.`         | Where generated models are written       |
//!
//! \* Required for `verify` and `generate`. Flags override the environment.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twin_client::config::ClientConfig;
use twin_client::download::DirectorySink;
use twin_client::files::load_photo;
use twin_client::handlers::{handle, Handled, UiEvent};
use twin_client::orchestrator::Orchestrator;
use twin_client::transport::HttpTransport;
use twin_core::preset::Preset;
use twin_core::roles::Role;

#[derive(Parser, Debug)]
#[command(name = "twin")]
#[command(about = "Check body photos and generate a 3D digital twin")]
#[command(version)]
struct Args {
    /// Body figure preset
    #[arg(long, default_value = "female")]
    preset: Preset,

    /// Front photo
    #[arg(long)]
    front: Option<PathBuf>,

    /// Side photo
    #[arg(long)]
    side: Option<PathBuf>,

    /// Back photo
    #[arg(long)]
    back: Option<PathBuf>,

    /// Optional foot photo
    #[arg(long)]
    foot: Option<PathBuf>,

    /// Measurement in centimetres as POINT=VALUE, e.g. m_waist=72
    #[arg(short, long = "measure", value_parser = parse_measure)]
    measure: Vec<(String, String)>,

    /// Service endpoint (overrides TWIN_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Bearer token (overrides TWIN_API_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Host allowed to receive the token (overrides TWIN_EXPECTED_HOST)
    #[arg(long)]
    expected_host: Option<String>,

    /// Download directory (overrides TWIN_DOWNLOAD_DIR)
    #[arg(short, long)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Check photo quality only
    Verify,
    /// Check photos and generate a model
    Generate,
    /// List the measurement points of the preset
    Points,
}

/// Split `POINT=VALUE`. The value is kept raw; the session parses it.
fn parse_measure(raw: &str) -> Result<(String, String), String> {
    let (point, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected POINT=VALUE, got '{raw}'"))?;
    let point = point.trim();
    if point.is_empty() {
        return Err(format!("missing measurement point in '{raw}'"));
    }
    Ok((point.to_string(), value.trim().to_string()))
}

fn resolve_config(args: &Args) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = Some(endpoint.clone());
    }
    if let Some(token) = &args.token {
        config.api_token = Some(token.clone());
    }
    if let Some(host) = &args.expected_host {
        config.expected_host = host.clone();
    }
    if let Some(out) = &args.out {
        config.download_dir = out.clone();
    }
    config
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "twin_cli=info,twin_client=info,twin_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "twin failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    if args.command == Command::Points {
        print_points(args.preset);
        return Ok(());
    }

    let config = resolve_config(&args);
    tracing::info!(
        preset = %args.preset,
        endpoint = config.endpoint().unwrap_or("<unset>"),
        download_dir = %config.download_dir.display(),
        "Starting twin",
    );

    let sink = DirectorySink::new(config.download_dir.clone());
    let orchestrator = Orchestrator::new(config, Arc::new(HttpTransport::new()), args.preset);

    let photos = [
        (Role::Front, &args.front),
        (Role::Side, &args.side),
        (Role::Back, &args.back),
        (Role::Foot, &args.foot),
    ];
    for (role, path) in photos {
        let Some(path) = path else { continue };
        let file = load_photo(path)
            .await
            .with_context(|| format!("Failed to open {} photo {}", role.label(), path.display()))?;
        handle(&orchestrator, &sink, UiEvent::PhotoSelected { role, file })
            .await
            .with_context(|| format!("{} photo rejected", role.label()))?;
    }

    for (point_id, raw) in &args.measure {
        let handled = handle(
            &orchestrator,
            &sink,
            UiEvent::MeasurementInput {
                point_id: point_id.clone(),
                raw: raw.clone(),
            },
        )
        .await?;
        if let Handled::Measurement(None) = handled {
            tracing::warn!(point = %point_id, raw = %raw, "Ignored measurement that is not a positive number");
        }
    }

    let event = match args.command {
        Command::Generate => UiEvent::GenerateClicked,
        _ => UiEvent::VerifyClicked,
    };
    let result = handle(&orchestrator, &sink, event).await;
    print_session(&orchestrator).await;
    let handled = result?;

    if let Handled::Workflow(outcome) = handled {
        if outcome.model_bytes.is_some() {
            if let Handled::Downloaded(path) = handle(&orchestrator, &sink, UiEvent::DownloadClicked).await? {
                println!("Model saved to {}", path.display());
            }
        }
    }

    Ok(())
}

fn print_points(preset: Preset) {
    let registry = twin_core::registry::registry(preset);
    println!("Measurement points ({preset}, figure {}):", registry.figure.asset);
    for point in registry.points {
        println!("  {:<12} {}", point.id, point.label);
    }
}

async fn print_session(orchestrator: &Orchestrator) {
    let session = orchestrator.session().await;

    if !session.qa_view.chips.is_empty() {
        println!("{}", session.qa_view);
    }
    if let Some(banner) = session.status.banner() {
        println!("{}: {}", banner.level, banner.text);
    }
    for entry in session.status.entries() {
        println!("{entry}");
    }
}
