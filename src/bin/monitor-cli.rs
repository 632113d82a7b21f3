use std::path::PathBuf;
use clap::{Parser, Subcommand};
use serde_json::Value;
use uuid::Uuid;

use uptime_monitor::aggregate::Aggregator;
use uptime_monitor::sink::read_events;

#[derive(Parser)]
#[command(name = "monitor-cli")]
#[command(about = "Management CLI for the uptime monitor", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check monitor status
    Status,
    /// List endpoints with their last result and counters
    Endpoints,
    /// Show aggregate counters
    Counters,
    /// Show the latest cycle report
    Latest,
    /// Rebuild counters offline from an event log
    Replay {
        /// Path to the JSON-lines event log
        #[arg(short, long, default_value = "api_uptime.log")]
        log: PathBuf,

        /// Only count results from this session
        #[arg(short, long)]
        session: Option<Uuid>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let path = match cli.command {
        Commands::Status => "/admin/status",
        Commands::Endpoints => "/admin/endpoints",
        Commands::Counters => "/admin/counters",
        Commands::Latest => "/admin/cycles/latest",
        Commands::Replay { log, session } => {
            let events = read_events(&log)?;
            let aggregator = Aggregator::new();
            let applied = aggregator.replay(&events, session);
            eprintln!("Replayed {} results from {} events", applied, events.len());
            println!("{}", serde_json::to_string_pretty(&aggregator.snapshot())?);
            return Ok(());
        }
    };

    let client = reqwest::Client::new();
    let res = client.get(format!("{}{}", cli.url, path)).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
