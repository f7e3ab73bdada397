use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{PredictionClient, PredictionService};
use form_controller::{ErrorDisplayPolicy, FormController, WorkflowOutcome};
use shared::{domain::FormState, protocol::ModelInfo};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod interactive;
mod terminal;

use config::{load_settings, Settings, DEFAULT_SETTINGS_FILE};
use interactive::run_interactive;
use terminal::TerminalView;

#[derive(Parser, Debug)]
#[command(about = "Submit form values to a prediction service")]
struct Cli {
    /// Settings file; missing files fall back to defaults.
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Show the reason a service gives for a failed prediction instead of the generic message.
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    show_service_errors: Option<bool>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One attempt with values given as `--field name=value`.
    Submit {
        #[arg(long = "field", value_parser = parse_field_assignment)]
        fields: Vec<(String, String)>,
    },
    /// Prompt for each field in turn.
    Interactive,
    ModelInfo,
}

impl Cli {
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(server_url) = &self.server_url {
            settings.server_url = server_url.clone();
        }
        if let Some(show) = self.show_service_errors {
            settings.show_service_errors = show;
        }
    }
}

fn parse_field_assignment(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config)?;
    cli.apply_overrides(&mut settings);

    let client = PredictionClient::with_timeout(&settings.server_url, settings.request_timeout())
        .with_context(|| format!("failed to set up client for {}", settings.server_url))?;
    info!(server_url = %client.server_url(), "prediction client ready");

    match cli.command {
        Command::Submit { fields } => {
            Ok(run_submit(settings, client, fields, io::stdout()).await)
        }
        Command::Interactive => {
            let policy = ErrorDisplayPolicy::from_show_service_errors(settings.show_service_errors);
            let view = TerminalView::new(io::stdout());
            let mut controller =
                FormController::new(settings.schema, view, client).with_error_policy(policy);
            let stdin = BufReader::new(tokio::io::stdin());
            let submissions = run_interactive(&mut controller, stdin).await?;
            info!(submissions, "interactive session finished");
            Ok(ExitCode::SUCCESS)
        }
        Command::ModelInfo => {
            let model = client
                .model_info()
                .await
                .context("failed to fetch model info")?;
            print_model_info(&model, &mut io::stdout().lock())
                .context("failed to write model info")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_submit<S, W>(
    settings: Settings,
    service: S,
    fields: Vec<(String, String)>,
    out: W,
) -> ExitCode
where
    S: PredictionService,
    W: Write,
{
    let values: FormState = fields.into_iter().collect();
    let policy = ErrorDisplayPolicy::from_show_service_errors(settings.show_service_errors);
    let view = TerminalView::with_values(out, values);
    let mut controller =
        FormController::new(settings.schema, view, service).with_error_policy(policy);

    let outcome = controller.submit().await;
    exit_code(&outcome)
}

fn exit_code(outcome: &WorkflowOutcome) -> ExitCode {
    if outcome.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_model_info(model: &ModelInfo, out: &mut impl Write) -> io::Result<()> {
    match model.n_estimators {
        Some(n) => writeln!(out, "{} ({n} estimators)", model.model_type)?,
        None => writeln!(out, "{}", model.model_type)?,
    }
    let mut ranked: Vec<_> = model.feature_importance.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(a.1));
    for (feature, importance) in ranked {
        writeln!(out, "  {feature:<28} {importance:.4}")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
