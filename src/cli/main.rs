use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use incident_tracker::api::INCIDENTS_PATH;
use incident_tracker::query::ListParams;
use reqwest::{Client, Response};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "incident-cli")]
#[command(about = "Incident tracker CLI", long_about = None)]
struct Cli {
    #[arg(short, long, env = "INCIDENT_TRACKER_ENDPOINT", default_value = "http://localhost:8080")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List incidents
    List {
        #[arg(short, long)]
        page: Option<u64>,

        #[arg(short, long)]
        limit: Option<u64>,

        /// Field to sort by (e.g. createdAt, severity, title)
        #[arg(long)]
        sort: Option<String>,

        /// asc or desc
        #[arg(short, long)]
        order: Option<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        severity: Option<String>,

        #[arg(long)]
        service: Option<String>,

        /// Case-insensitive text matched against title and summary
        #[arg(short = 'q', long)]
        search: Option<String>,
    },

    /// Get incident details
    Get {
        #[arg(value_name = "INCIDENT_ID")]
        id: String,
    },

    /// Create an incident
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short = 'S', long)]
        service: String,

        #[arg(short, long, default_value = "SEV3")]
        severity: String,

        #[arg(long, default_value = "OPEN")]
        status: String,

        #[arg(short, long)]
        owner: Option<String>,

        #[arg(long)]
        summary: Option<String>,
    },

    /// Update selected fields of an incident
    Update {
        #[arg(value_name = "INCIDENT_ID")]
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short = 'S', long)]
        service: Option<String>,

        #[arg(short, long)]
        severity: Option<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(short, long, conflicts_with = "clear_owner")]
        owner: Option<String>,

        /// Remove the current owner
        #[arg(long)]
        clear_owner: bool,

        #[arg(long, conflicts_with = "clear_summary")]
        summary: Option<String>,

        /// Remove the current summary
        #[arg(long)]
        clear_summary: bool,
    },

    /// Check server health
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new();
    let incidents_url = format!("{}{}", cli.endpoint.trim_end_matches('/'), INCIDENTS_PATH);

    let response = match cli.command {
        Commands::List {
            page,
            limit,
            sort,
            order,
            status,
            severity,
            service,
            search,
        } => {
            let params = ListParams {
                page: page.map(|p| p.to_string()),
                limit: limit.map(|l| l.to_string()),
                sort,
                order,
                status,
                severity,
                service,
                search,
            };

            client.get(&incidents_url).query(&params).send().await
        }

        Commands::Get { id } => client.get(format!("{}/{}", incidents_url, id)).send().await,

        Commands::Create {
            title,
            service,
            severity,
            status,
            owner,
            summary,
        } => {
            client
                .post(&incidents_url)
                .json(&json!({
                    "title": title,
                    "service": service,
                    "severity": severity,
                    "status": status,
                    "owner": owner,
                    "summary": summary,
                }))
                .send()
                .await
        }

        Commands::Update {
            id,
            title,
            service,
            severity,
            status,
            owner,
            clear_owner,
            summary,
            clear_summary,
        } => {
            let mut patch = Map::new();
            insert_some(&mut patch, "title", title);
            insert_some(&mut patch, "service", service);
            insert_some(&mut patch, "severity", severity);
            insert_some(&mut patch, "status", status);
            insert_nullable(&mut patch, "owner", owner, clear_owner);
            insert_nullable(&mut patch, "summary", summary, clear_summary);

            if patch.is_empty() {
                bail!("nothing to update; pass at least one field flag");
            }

            client
                .patch(format!("{}/{}", incidents_url, id))
                .json(&Value::Object(patch))
                .send()
                .await
        }

        Commands::Health => {
            client
                .get(format!("{}/health", cli.endpoint.trim_end_matches('/')))
                .send()
                .await
        }
    }
    .with_context(|| format!("request to {} failed", cli.endpoint))?;

    print_response(response).await
}

fn insert_some(patch: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        patch.insert(key.to_string(), Value::String(value));
    }
}

fn insert_nullable(patch: &mut Map<String, Value>, key: &str, value: Option<String>, clear: bool) {
    if clear {
        patch.insert(key.to_string(), Value::Null);
    } else {
        insert_some(patch, key, value);
    }
}

async fn print_response(response: Response) -> anyhow::Result<()> {
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .context("server returned a non-JSON body")?;

    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        bail!("server responded with {}", status);
    }
    Ok(())
}
