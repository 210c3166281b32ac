use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cheeseup::estimate::{Estimator, PriceOracle};
use cheeseup::powerup::compose_action;
use cheeseup::types::{format_bytes, format_quantity, PowerUpRequest};
use cheeseup::{ChainConfig, ChainReader, QueryClient, Session};

#[derive(Parser, Debug)]
#[command(name = "cheeseup")]
#[command(about = "CheeseUp chain client - query balances, stats, and compose PowerUps")]
struct Args {
    /// Path to a TOML config file; built-in WAX mainnet defaults otherwise
    #[arg(short, long)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show an account's CHEESE balance
    Balance { account: String },

    /// Show the service contract's aggregate counters
    Stats,

    /// Show the global PowerUp pool weights
    PoolState,

    /// Estimate the CPU/NET grant for a CHEESE spend
    Estimate { cpu: f64, net: f64 },

    /// Compose a PowerUp transfer without submitting it (signing happens in
    /// an external wallet); validates against the sender's live balance and
    /// prints the exact action JSON
    Compose {
        cpu: f64,
        net: f64,
        /// Sending account
        #[arg(long)]
        from: String,
        /// Recipient account; defaults to the sender
        #[arg(long)]
        recipient: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = match &args.config {
        Some(path) => ChainConfig::load(path)?,
        None => ChainConfig::default(),
    };

    let client = QueryClient::new(config.endpoints.clone());
    let reader = ChainReader::new(client, config.clone());

    match args.command {
        Command::Balance { account } => {
            let balance = reader.fetch_balance(&account).await?;
            println!("{}", format_quantity(balance, &config.token_symbol));
        }
        Command::Stats => {
            let stats = reader.refresh_stats().await?;
            println!("total powerups:  {}", stats.total_powerups);
            println!("WAX burnt:       {}", format_quantity(stats.wax_burnt, "WAX"));
            println!(
                "CHEESE nulled:   {}",
                format_quantity(stats.cheese_nulled, &config.token_symbol)
            );
        }
        Command::PoolState => match reader.fetch_powerup_state().await? {
            Some(state) => {
                println!("cpu weight:       {}", state.cpu_weight);
                println!("net weight:       {}", state.net_weight);
                println!("cpu weight ratio: {}", state.cpu_weight_ratio);
                println!("net weight ratio: {}", state.net_weight_ratio);
            }
            None => println!("powerup pool state not found"),
        },
        Command::Estimate { cpu, net } => {
            let estimator = Estimator::new(PriceOracle::new(
                config.oracle_url.clone(),
                config.fallback_price,
            ));
            match estimator.quote(cpu, net).await {
                Some(estimate) => {
                    println!("price: {:.6} WAX/{}", estimate.price_in_wax, config.token_symbol);
                    println!("cpu:   ~{:.0} ms", estimate.cpu_ms);
                    println!("net:   ~{}", format_bytes(estimate.net_bytes));
                }
                None => println!("nothing to estimate"),
            }
        }
        Command::Compose {
            cpu,
            net,
            from,
            recipient,
        } => {
            let balance = reader.fetch_balance(&from).await?;
            let session = Session {
                actor: from,
                permission: "active".to_string(),
            };
            let request = PowerUpRequest {
                recipient,
                cpu_amount: cpu,
                net_amount: net,
            };
            let (action, resolved) = compose_action(&config, &session, &request, balance)?;
            eprintln!("recipient: {resolved}");
            println!("{}", serde_json::to_string_pretty(&action)?);
        }
    }

    Ok(())
}
