use anyhow::{bail, Context, Result};
use clap::Parser;
use std::time::Duration;
use wallet_assets::display::render_lines;
use wallet_assets::utils::logging;
use wallet_assets::{fetch_assets, AssetListRequest, AssetListState, Network, NetworkConfig};

#[derive(Debug, Clone, Parser)]
#[command(name = "wallet-assets")]
#[command(about = "Show the SOL, stablecoin and token balances of a Solana account")]
struct Args {
    /// Cluster to query (devnet, mainnet)
    #[arg(long, default_value_t = Network::Devnet)]
    network: Network,

    /// Override the RPC endpoint for the selected network
    #[arg(long)]
    rpc_url: Option<String>,

    /// Fetch timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the full response as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Debug logging to stderr
    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    /// Account public key (base58). Omit to render the disconnected state.
    account: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if args.verbose {
        logging::enable_debug();
    }

    let mut config = NetworkConfig::from_env().context("invalid environment configuration")?;
    if let Some(secs) = args.timeout {
        config
            .set_request_timeout(Duration::from_secs(secs))
            .context("invalid --timeout")?;
    }

    let request = AssetListRequest {
        account: args.account,
        network: args.network,
        endpoint: args.rpc_url,
    };
    let response = fetch_assets(&request, &config).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{} ({})", response.network.label(), response.endpoint);
        for line in render_lines(&response.state) {
            println!("{}", line);
        }
    }

    if let AssetListState::Failed { error } = &response.state {
        bail!("asset fetch failed: {}", error);
    }
    Ok(())
}
