use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "wallet-cli")]
#[command(about = "Command-line client for the agent wallet API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080", env = "AGENT_WALLET_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a transfer and print the pending plan
    Plan {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "ethereum")]
        chain: String,
        #[arg(long, default_value = "ETH")]
        symbol: String,
        #[arg(long, default_value_t = 18)]
        decimals: u8,
        /// Token contract; omit for the chain's native asset
        #[arg(long)]
        contract: Option<String>,
        #[arg(long)]
        memo: Option<String>,
    },
    /// Execute a pending plan
    Execute { plan_id: String },
    /// Show plan status and receipt
    Status { plan_id: String },
    /// Check service health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = match cli.command {
        Commands::Plan {
            from,
            to,
            amount,
            chain,
            symbol,
            decimals,
            contract,
            memo,
        } => {
            let body = json!({
                "fromWalletId": from,
                "toAddress": to,
                "amount": amount,
                "chain": chain,
                "asset": {
                    "symbol": symbol,
                    "decimals": decimals,
                    "contractAddress": contract,
                },
                "memo": memo,
            });
            client
                .post(format!("{}/tx/plan", cli.url))
                .json(&body)
                .send()
                .await?
        }
        Commands::Execute { plan_id } => {
            client
                .post(format!("{}/tx/execute", cli.url))
                .json(&json!({ "planId": plan_id }))
                .send()
                .await?
        }
        Commands::Status { plan_id } => {
            client
                .get(format!("{}/tx/{}", cli.url, plan_id))
                .send()
                .await?
        }
        Commands::Health => client.get(format!("{}/health", cli.url)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
        Ok(())
    } else {
        eprintln!("Error: wallet API returned status {}", status);
        eprintln!("{}", rendered);
        std::process::exit(1);
    }
}
