use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use content_service::content::ContentEncoder;

#[derive(Parser)]
#[command(name = "content-cli")]
#[command(about = "Query a running rule content service", long_about = None)]
struct Cli {
    /// Base URL including the API prefix
    #[arg(short, long, default_value = "http://localhost:8080/api/v1/")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service liveness
    Info,
    /// List rule groups
    Groups,
    /// List rule identifiers
    Rules,
    /// Download and decode the full content blob
    Content {
        /// Print every rule body instead of a summary
        #[arg(long)]
        full: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = if cli.url.ends_with('/') {
        cli.url.clone()
    } else {
        format!("{}/", cli.url)
    };

    match cli.command {
        Commands::Info => {
            let res = client.get(&base).send().await?;
            print_response(res).await?;
        }
        Commands::Groups => {
            let res = client.get(format!("{}groups", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Rules => {
            let res = client.get(format!("{}rules", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Content { full } => {
            let res = client.get(format!("{}content", base)).send().await?;
            let status = res.status();
            if !status.is_success() {
                eprintln!("Error: content endpoint returned status {}", status);
                if let Ok(text) = res.text().await {
                    eprintln!("Response: {}", text);
                }
                return Ok(());
            }

            let blob = res.bytes().await?;
            let catalog = ContentEncoder::new(u64::MAX).decode(&blob)?;

            let output = if full {
                let rules: serde_json::Map<String, Value> = catalog
                    .all_rules()
                    .map(|r| (r.plugin_id().to_string(), Value::from(&r.body)))
                    .collect();
                json!({ "impact": catalog.config().impact, "rules": rules })
            } else {
                json!({
                    "encoded_bytes": blob.len(),
                    "rules": catalog.len(),
                    "impact": catalog.config().impact,
                })
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
