use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stock_price_dynamics::io::reporting;
use stock_price_dynamics::server::config::ServerConfig;
use stock_price_dynamics::server::Server;
use stock_price_dynamics::simulation::random::fresh_seed;
use stock_price_dynamics::{simulate, SimulationParameters};

#[derive(Debug, Parser)]
#[command(name = "stock-price-dynamics", version, about = "Retail stock price simulation")]
struct Cli {
    /// Default log level when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<Level>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the simulation over HTTP (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one simulation and export the series to CSV
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    #[arg(long, default_value_t = 50.0)]
    unit_price: f64,
    #[arg(long, default_value_t = 100.0)]
    unit_sale: f64,
    #[arg(long, default_value_t = 0.1)]
    benefit_rate: f64,
    #[arg(long, default_value_t = 10_000.0)]
    fixed_expenses: f64,
    #[arg(long, default_value_t = 5)]
    supply_delay: u32,
    #[arg(long, default_value_t = 0.2)]
    stock_rate: f64,
    #[arg(long, default_value_t = 50)]
    order_count: usize,
    #[arg(long, default_value_t = 4)]
    order_frequency: u32,
    #[arg(long, default_value_t = 60)]
    horizon_days: u32,
    #[arg(long, default_value_t = 100)]
    order_mean_qty: u32,
    #[arg(long, default_value_t = 5.0)]
    order_fluctuation: f64,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, short, default_value = "simulation_results.csv")]
    output: PathBuf,
}

impl From<&RunArgs> for SimulationParameters {
    fn from(args: &RunArgs) -> Self {
        Self {
            unit_price: args.unit_price,
            unit_sale: args.unit_sale,
            benefit_rate: args.benefit_rate,
            fixed_expenses: args.fixed_expenses,
            supply_delay: args.supply_delay,
            stock_rate: args.stock_rate,
            order_count: args.order_count,
            order_frequency: args.order_frequency,
            horizon_days: args.horizon_days,
            order_mean_qty: args.order_mean_qty,
            order_fluctuation: args.order_fluctuation,
        }
    }
}

fn init_tracing(level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ServerConfig::from_env()?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    init_tracing(config.log_level);

    match cli.command {
        None => serve(config).await,
        Some(Command::Serve { host, port }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            config.validate()?;
            serve(config).await
        }
        Some(Command::Run(args)) => run_once(&args),
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    let server = Server::new(config);
    info!(
        host = %server.config().host,
        port = server.config().port,
        "Starting stock price simulation service"
    );
    server.run().await
}

fn run_once(args: &RunArgs) -> Result<()> {
    println!("=== Stock Price Dynamics Simulation ===");

    let params = SimulationParameters::from(args);
    let seed = args.seed.unwrap_or_else(fresh_seed);
    let result = simulate(params, seed)?;

    reporting::write_simulation_log(&args.output, &result)
        .map_err(|e| anyhow::anyhow!("writing {}: {}", args.output.display(), e))?;
    println!(
        "Success! {} dates written to {}",
        result.len(),
        args.output.display()
    );

    println!("\n=== Summary ===");
    println!("Seed: {}", seed);
    if let (Some(&last_date), Some(&last_price)) = (result.dates.last(), result.stock_price.last())
    {
        println!("Final stock price (day {}): {:.2}", last_date, last_price);
    }
    match result.depletion_date() {
        Some(day) => println!("Stock price first reaches zero on day {}", day),
        None => println!("Stock price stays positive over the horizon"),
    }
    if !result.singular_indices.is_empty() {
        println!(
            "Supply matched orders exactly on {} date(s)",
            result.singular_indices.len()
        );
    }

    Ok(())
}
