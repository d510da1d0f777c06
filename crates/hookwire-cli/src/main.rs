use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use hookwire_core::app::AppBuilder;
use hookwire_core::config::Settings;
use hookwire_core::domain::{
    HeaderValidator, NewWebhook, OrganizationId, Payload, WebhookActionKind,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hookwire", version, about = "Organization webhooks: inspect and emit events")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every action kind a webhook can subscribe to
    Actions,

    /// Check a JSON object against the webhook header schema
    ValidateHeaders {
        /// e.g. '{"Authorization": "Token abc"}'
        headers: String,
    },

    /// Load webhooks from a fixture file and emit one event to them
    Emit {
        /// JSON array of webhook definitions (url, send_payload, headers, actions, ...)
        #[arg(long)]
        fixtures: PathBuf,

        /// Action kind, e.g. TASK_CREATED
        #[arg(long)]
        action: WebhookActionKind,

        /// JSON object merged into the body of webhooks with send_payload on
        #[arg(long)]
        payload: Option<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn parse_payload(raw: &str) -> Result<Payload> {
    match serde_json::from_str(raw).context("payload is not valid JSON")? {
        serde_json::Value::Object(map) => Ok(map),
        other => bail!("payload must be a JSON object, got {other}"),
    }
}

async fn emit(fixtures: PathBuf, action: WebhookActionKind, payload: Option<String>) -> Result<()> {
    let settings = Settings::from_env()?;
    let app = AppBuilder::new().settings(settings).build()?;

    let raw = std::fs::read_to_string(&fixtures)
        .with_context(|| format!("failed to read {}", fixtures.display()))?;
    let definitions: Vec<NewWebhook> =
        serde_json::from_str(&raw).context("fixtures must be a JSON array of webhooks")?;
    let payload = payload.as_deref().map(parse_payload).transpose()?;

    // fixture の webhook はすべて 1 つの組織に属する
    let organization = OrganizationId::random();
    for definition in definitions {
        app.webhooks.create_webhook(organization, definition).await?;
    }
    info!(organization_id = %organization, %action, "emitting event");

    let report = app.dispatcher.emit_event(organization, action, payload).await;
    println!("{}", serde_json::to_string_pretty(&report.counts)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Actions => {
            for kind in WebhookActionKind::ALL {
                match kind.description() {
                    "" => println!("{:<20} {}", kind.as_str(), kind.name()),
                    description => {
                        println!("{:<20} {} - {description}", kind.as_str(), kind.name())
                    }
                }
            }
        }
        Command::ValidateHeaders { headers } => {
            let value: serde_json::Value =
                serde_json::from_str(&headers).context("headers are not valid JSON")?;
            match HeaderValidator::validate(&value) {
                Ok(()) => println!("ok"),
                Err(violation) => bail!("invalid headers: {violation}"),
            }
        }
        Command::Emit {
            fixtures,
            action,
            payload,
        } => emit(fixtures, action, payload).await?,
    }
    Ok(())
}
