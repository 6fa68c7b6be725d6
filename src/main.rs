use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clinical_dashboard::commands::{Command, DEFAULT_MODEL_NAME, DEFAULT_MODEL_TYPE};
use clinical_dashboard::config::DashboardConfig;
use clinical_dashboard::dashboard::Dashboard;
use clinical_dashboard::document::Document;
use clinical_dashboard::fetcher::ApiClient;
use clinical_dashboard::models::{CommandResult, SectionKind, SectionStatus};
use clinical_dashboard::prompt::{AssumeYes, ConsolePrompt, Prompt};

#[derive(Parser)]
#[command(name = "clinical-dashboard")]
#[command(about = "Loads and drives the readmission risk dashboard", long_about = None)]
struct Cli {
    /// Dashboard server root; falls back to DASHBOARD_URL
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Cookie header carrying the anti-forgery token; falls back to DASHBOARD_COOKIE
    #[arg(long, global = true)]
    cookie: Option<String>,
    #[arg(long, global = true)]
    csrf_cookie_name: Option<String>,
    /// Skip confirmation prompts
    #[arg(long, global = true)]
    yes: bool,
    /// Write the rendered page to this file when done
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every section, as the page does on open
    Load,
    /// Reload a single section
    Refresh {
        #[arg(long, value_enum)]
        section: SectionKind,
    },
    /// Score every patient still missing a prediction
    BulkPredict,
    /// Train a new model
    TrainModel {
        #[arg(long, default_value = DEFAULT_MODEL_TYPE)]
        model_type: String,
        #[arg(long, default_value = DEFAULT_MODEL_NAME)]
        model_name: String,
    },
    /// Make a model the active prediction model
    ActivateModel {
        #[arg(long)]
        id: u64,
    },
    /// Write the analytics section as a markdown report
    ExportAnalytics {
        #[arg(long, default_value = "analytics.md")]
        out: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let base_url = match cli.base_url {
        Some(url) => url,
        None => std::env::var("DASHBOARD_URL")
            .context("DASHBOARD_URL must be set to the dashboard server root")?,
    };
    let cookie = cli.cookie.or_else(|| std::env::var("DASHBOARD_COOKIE").ok());
    let config = DashboardConfig::new(&base_url, cookie, cli.csrf_cookie_name)
        .context("invalid dashboard configuration")?;

    let client =
        ApiClient::new(config.base_url.clone()).context("failed to build HTTP client")?;
    let dashboard = Dashboard::new(client, config.cookie_jar(), Document::dashboard());
    let mut prompt: Box<dyn Prompt> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(ConsolePrompt)
    };

    let outcome = match cli.command {
        Commands::Load => {
            dashboard.init().await;
            for kind in SectionKind::ALL {
                print_status(kind, &dashboard.sections().get(kind).status());
            }
            Ok(())
        }
        Commands::Refresh { section } => {
            let status = dashboard.show(section).await;
            print_status(section, &status);
            Ok(())
        }
        Commands::BulkPredict => {
            run_command(&dashboard, &Command::BulkPredict, prompt.as_mut()).await
        }
        Commands::TrainModel {
            model_type,
            model_name,
        } => {
            let command = Command::TrainModel {
                model_type,
                model_name,
            };
            run_command(&dashboard, &command, prompt.as_mut()).await
        }
        Commands::ActivateModel { id } => {
            run_command(&dashboard, &Command::ActivateModel { id }, prompt.as_mut()).await
        }
        Commands::ExportAnalytics { out } => {
            let report = dashboard
                .export_analytics()
                .await
                .context("failed to fetch analytics")?;
            std::fs::write(&out, report)?;
            println!("Analytics report written to {}.", out.display());
            Ok(())
        }
    };

    if let Some(path) = cli.snapshot {
        let html = dashboard.document().borrow().snapshot_html();
        std::fs::write(&path, html)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        println!("Page snapshot written to {}.", path.display());
    }

    outcome
}

async fn run_command(
    dashboard: &Dashboard,
    command: &Command,
    prompt: &mut dyn Prompt,
) -> anyhow::Result<()> {
    let result = dashboard.execute(command, prompt).await;
    match &result {
        None => println!("Cancelled."),
        Some(CommandResult::Success(_)) => {
            for kind in command.dependents() {
                print_status(*kind, &dashboard.sections().get(*kind).status());
            }
        }
        Some(CommandResult::Failure { .. }) => {}
    }
    command_outcome(command, result.as_ref())
}

/// A failed command makes the process exit non-zero; a declined one does not.
fn command_outcome(command: &Command, result: Option<&CommandResult>) -> anyhow::Result<()> {
    match result {
        Some(CommandResult::Failure { message }) => {
            anyhow::bail!("{} failed: {message}", command.name())
        }
        _ => Ok(()),
    }
}

fn print_status(kind: SectionKind, status: &SectionStatus) {
    match status {
        SectionStatus::Failed(message) => println!("- {}: failed ({message})", kind.label()),
        other => println!("- {}: {:?}", kind.label(), other),
    }
}
