use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use benchwatch::{Category, DisplayRange};

#[derive(Parser)]
#[command(name = "benchwatch")]
#[command(about = "Track daily commodity benchmark prices", long_about = None)]
struct Cli {
    /// Directory holding one JSON record per commodity
    #[arg(long, global = true, env = "BENCHWATCH_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, merge, and save every commodity in the catalog
    Update {
        /// JSON catalog file (defaults to the built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Maximum concurrent commodity updates
        #[arg(long)]
        concurrency: Option<usize>,
        /// Only update these ids (comma separated)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,
        /// FRED API key
        #[arg(long, env = "FRED_API_KEY", hide_env_values = true)]
        fred_api_key: Option<String>,
        /// EIA API key
        #[arg(long, env = "EIA_API_KEY", hide_env_values = true)]
        eia_api_key: Option<String>,
    },
    /// List stored commodities
    List {
        /// Restrict to one category (energy, metals, precious, agriculture)
        #[arg(long)]
        category: Option<Category>,
        /// Display window: 1W, 1M, 3M, 6M, 1Y, ALL
        #[arg(long, default_value = "ALL")]
        range: DisplayRange,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Latest price for one commodity (alias, id, or part of the name)
    Price {
        query: String,
        /// Print the full record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Latest prices for a whole category
    Prices { category: Category },
    /// Largest one-observation gainers and losers
    Top {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // API keys may live in a .env file next to the data
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    match cli.command {
        Commands::Update {
            catalog,
            concurrency,
            only,
            fred_api_key,
            eia_api_key,
        } => {
            commands::update(commands::UpdateArgs {
                data_dir: cli.data_dir,
                catalog,
                concurrency,
                only,
                fred_api_key,
                eia_api_key,
            })
            .await
        }
        Commands::List {
            category,
            range,
            json,
        } => commands::list(&cli.data_dir, category, range, json),
        Commands::Price { query, json } => commands::price(&cli.data_dir, &query, json),
        Commands::Prices { category } => commands::prices(&cli.data_dir, category),
        Commands::Top { limit } => commands::top(&cli.data_dir, limit),
    }
}
